//! Raw input handling: wire events, key normalization, release timers and
//! monitor resolution

pub mod event;
pub mod keys;
pub mod monitor;
pub mod release;

pub use event::{DeviceEvent, EventDecodeError, GamepadEvent, GamepadEventKind, HostMessage};
pub use keys::{normalize_key, KeyLookup, Side, SupportedKey, SupportedKeys};
pub use monitor::{resolve_cursor_monitor, CursorMonitor, CursorPoint, Monitor};
pub use release::{ReleaseFired, ReleaseScheduler};
