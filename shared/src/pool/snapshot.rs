use tidepool_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr, UnsignedInteger};

use crate::{InstanceId, Placement, PoolKind, SlotMask, MAX_SLOTS};

/// One slot as shipped to observers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotInstance {
    pub id: InstanceId,
    pub placement: Placement,
}

/// The full replicated state of one pool entry.
///
/// The authority always ships the whole entry; observers work out what changed
/// by diffing `usage_mask` against the mask they applied last. Holds at most
/// `MAX_SLOTS` instances and never marks a slot past the last instance.
#[derive(Clone, Debug, PartialEq)]
pub struct PoolEntrySnapshot {
    pub(crate) kind: PoolKind,
    pub(crate) usage_mask: SlotMask,
    pub(crate) instances: Vec<SnapshotInstance>,
}

impl PoolEntrySnapshot {
    pub fn new(
        kind: PoolKind,
        usage_mask: SlotMask,
        instances: Vec<SnapshotInstance>,
    ) -> Result<Self, SerdeErr> {
        let count = checked_count(instances.len())?;
        if !usage_mask.fits_within(count) {
            return Err(SerdeErr::InvalidValue {
                what: "usage mask",
                reason: format!("{:?} addresses slots beyond the {} instances", usage_mask, count),
            });
        }
        Ok(Self {
            kind,
            usage_mask,
            instances,
        })
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn usage_mask(&self) -> SlotMask {
        self.usage_mask
    }

    pub fn instances(&self) -> &[SnapshotInstance] {
        &self.instances
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }

    /// Decodes exactly one entry. Anything after it other than zeroed
    /// padding is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerdeErr> {
        let mut reader = BitReader::new(bytes);
        let snapshot = Self::de(&mut reader)?;
        reader.finish()?;
        Ok(snapshot)
    }

    pub fn instance_count(&self) -> u8 {
        // fields are only set through `new`, `de` or a pool entry, all capped at MAX_SLOTS
        u8::try_from(self.instances.len()).map_or(MAX_SLOTS, |count| count.min(MAX_SLOTS))
    }
}

fn checked_count(count: usize) -> Result<u8, SerdeErr> {
    match u8::try_from(count) {
        Ok(count) if count <= MAX_SLOTS => Ok(count),
        _ => Err(SerdeErr::InvalidValue {
            what: "instance count",
            reason: format!("{} exceeds the {} slot ceiling", count, MAX_SLOTS),
        }),
    }
}

impl Serde for PoolEntrySnapshot {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let count = self.instance_count();
        self.kind.ser(writer);
        UnsignedInteger::<7>::new(count).ser(writer);
        for instance in self.instances.iter().take(usize::from(count)) {
            instance.id.ser(writer);
            instance.placement.ser(writer);
        }
        self.usage_mask.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let kind = PoolKind::de(reader)?;

        let count = UnsignedInteger::<7>::de(reader)?.get();
        let count = checked_count(usize::try_from(count).unwrap_or(usize::MAX))?;

        let mut instances = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let id = InstanceId::de(reader)?;
            let placement = Placement::de(reader)?;
            instances.push(SnapshotInstance { id, placement });
        }

        let usage_mask = SlotMask::de(reader)?;
        Self::new(kind, usage_mask, instances)
    }

    fn bit_length(&self) -> u32 {
        let mut output = self.kind.bit_length() + 7;
        for instance in self.instances.iter().take(usize::from(self.instance_count())) {
            output += instance.id.bit_length() + instance.placement.bit_length();
        }
        output + self.usage_mask.bit_length()
    }
}
