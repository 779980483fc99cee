use tidepool_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Where an instance sits in the world: translation, rotation quaternion
/// (x, y, z, w) and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Placement {
    pub const IDENTITY: Self = Self {
        translation: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0; 3],
    };

    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Serde for Placement {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.translation.ser(writer);
        self.rotation.ser(writer);
        self.scale.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            translation: Serde::de(reader)?,
            rotation: Serde::de(reader)?,
            scale: Serde::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        // ten f32 fields
        10 * 32
    }
}
