pub mod commands;
pub mod component_overwrite;
pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod login;
pub mod message;
pub mod message_kind;
pub mod portal;
pub mod storage;
pub mod transform;
