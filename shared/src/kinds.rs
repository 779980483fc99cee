use std::collections::HashMap;

use log::info;
use tidepool_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::PoolError;

/// Identity of a pooled kind, stable across the wire because every peer
/// registers its kinds in the same order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolKind {
    net_id: u16,
}

impl PoolKind {
    pub fn net_id(&self) -> u16 {
        self.net_id
    }
}

impl Serde for PoolKind {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<4>::new(self.net_id).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value = UnsignedVariableInteger::<4>::de(reader)?.get();
        let net_id = u16::try_from(value).map_err(|_| SerdeErr::ValueOutOfRange { value, bits: 16 })?;
        Ok(Self { net_id })
    }

    fn bit_length(&self) -> u32 {
        UnsignedVariableInteger::<4>::new(self.net_id).bit_length()
    }
}

/// Per-kind defaults, captured when the kind's entry is first created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindDescriptor {
    pub name: String,
    /// Whether a freshly activated instance runs its periodic update
    pub start_with_tick_enabled: bool,
}

impl KindDescriptor {
    pub fn new(name: &str, start_with_tick_enabled: bool) -> Self {
        Self {
            name: name.to_string(),
            start_with_tick_enabled,
        }
    }
}

/// The kind table. Authority and observers must build it identically.
#[derive(Clone, Default)]
pub struct PoolKinds {
    descriptors: Vec<KindDescriptor>,
    by_name: HashMap<String, PoolKind>,
}

impl PoolKinds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_kind(&mut self, descriptor: KindDescriptor) -> Result<PoolKind, PoolError> {
        if self.by_name.contains_key(&descriptor.name) {
            return Err(PoolError::DuplicateKind {
                name: descriptor.name,
            });
        }
        let net_id = u16::try_from(self.descriptors.len()).map_err(|_| PoolError::KindTableFull {
            name: descriptor.name.clone(),
        })?;

        let kind = PoolKind { net_id };
        info!("PoolKinds: registered kind {} as {}", descriptor.name, net_id);
        self.by_name.insert(descriptor.name.clone(), kind);
        self.descriptors.push(descriptor);
        Ok(kind)
    }

    pub fn kind_by_name(&self, name: &str) -> Option<PoolKind> {
        self.by_name.get(name).copied()
    }

    pub fn descriptor(&self, kind: &PoolKind) -> Option<&KindDescriptor> {
        self.descriptors.get(usize::from(kind.net_id))
    }

    pub fn kind_name(&self, kind: &PoolKind) -> String {
        match self.descriptor(kind) {
            Some(descriptor) => descriptor.name.clone(),
            None => format!("<unknown kind {}>", kind.net_id),
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
