pub mod gesture;
pub mod hit;
pub mod input;
pub mod session;
pub mod shortcuts;

pub use gesture::{GestureEngine, GestureState};
pub use input::{Modifiers, PointerEvent};
pub use session::{EditorSession, ModeConfig};
pub use shortcuts::{ShortcutAction, ShortcutMap};
