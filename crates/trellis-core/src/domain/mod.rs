//! Domain model (IDs, entities, events, search documents, errors).
//!
//! このモジュールは store の種類を知りません。
//! primary store / cache / search index / notifier はすべて ports 側の話です。

pub mod document;
pub mod entity;
pub mod errors;
pub mod events;
pub mod ids;
pub mod post;
pub mod user;

pub use self::document::{SearchFields, SearchHit};
pub use self::entity::Entity;
pub use self::errors::{ErrorKind, RepositoryError};
pub use self::events::{ChangeKind, Event};
pub use self::ids::{Id, IdMarker, IdParseError, PostId, PostKind, UserId, UserKind};
pub use self::post::{Post, PostFields};
pub use self::user::{User, UserFields};
