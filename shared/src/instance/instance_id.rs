use tidepool_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

/// Opaque handle to a pooled object. The pool never looks inside it; it only
/// compares handles by identity and hands them back to the collaborators.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl Serde for InstanceId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<7>::new(self.0).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value = UnsignedVariableInteger::<7>::de(reader)?;
        Ok(Self(value.get()))
    }

    fn bit_length(&self) -> u32 {
        UnsignedVariableInteger::<7>::new(self.0).bit_length()
    }
}
