pub mod doc;
pub mod history;
pub mod id;
pub mod model;
pub mod scene;
pub mod viewport;
pub mod zorder;

pub use doc::{DocError, DocIssue, Document, Mode, SaveSink};
pub use history::History;
pub use id::ItemId;
pub use model::*;
pub use scene::Scene;
pub use viewport::{PxPoint, PxRect, Viewport};
