use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

/// Marks an entity as something that can sit in a storage slot
#[derive(Clone, Debug, PartialEq)]
pub struct StorableComponent {
    /// When false, stack class and max stack are ignored and every stack holds one item kind alone
    pub stackable: bool,
    /// Items only merge with items of the same class
    pub stack_class: Option<String>,
    pub max_stack: u32,
    pub icon_path: String,
}

impl StorableComponent {
    pub fn stackable(stack_class: &str, max_stack: u32) -> Self {
        Self {
            stackable: true,
            stack_class: Some(stack_class.to_string()),
            max_stack,
            icon_path: String::new(),
        }
    }

    pub fn unique() -> Self {
        Self {
            stackable: false,
            stack_class: None,
            max_stack: 1,
            icon_path: String::new(),
        }
    }

    /// Whether an item described by `other` can join a stack of this item
    pub fn stacks_with(&self, other: &StorableComponent) -> bool {
        self.stackable
            && other.stackable
            && self.stack_class.is_some()
            && self.stack_class == other.stack_class
    }
}

impl Serde for StorableComponent {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.stackable.ser(writer);
        self.stack_class.ser(writer);
        self.max_stack.ser(writer);
        self.icon_path.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            stackable: bool::de(reader)?,
            stack_class: Option::<String>::de(reader)?,
            max_stack: u32::de(reader)?,
            icon_path: String::de(reader)?,
        })
    }
}
