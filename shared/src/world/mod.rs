pub mod authority;
pub mod component;
pub mod entity_kind;
pub mod entity_record;
pub mod events;
pub mod owners;
pub mod scene;
pub mod storage;
