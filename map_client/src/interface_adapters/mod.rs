// Interface adapters: HTTP clients, wire protocol and the headless surface.

pub mod clients;
pub mod events;
pub mod headless;
pub mod notifier;
pub mod protocol;

pub use clients::{AuthClient, CommentClient};
pub use events::run_event_loop;
pub use headless::HeadlessMap;
pub use notifier::TracingNotifier;
