//! Post-mortem possession - take over another unit after the player falls
//!
//! Two ways to pick the next unit:
//! - Manual: possess whatever the spectator camera follows, subject to team policy
//! - Automatic: walk unit categories by configured priority and take the
//!   first living unit found
//!
//! Both end in the same control transfer. The engine is reached only
//! through the `RosterView`, `ControlHost` and `MissionHost` traits.

pub mod category;
pub mod control;
pub mod driver;
pub mod input;
pub mod manual;
pub mod mission;
pub mod notice;
pub mod priority;
pub mod roster;
pub mod selector;

// Re-exports for convenient access
pub use category::{FormationClass, UnitCategory, CATEGORY_COUNT};
pub use control::{transfer_control, ControlHost, ControlState, TransferOptions};
pub use driver::{MissionHost, PossessionMod, TickOutcome, TransferSource};
pub use input::{Key, Keymap, PossessionCommand};
pub use manual::{resolve_manual_target, ManualDecision};
pub use mission::{Controller, SimMission};
pub use notice::{Notice, NoticeGate, NoticeKind, NoticeSink, NOTICE_PREFIX};
pub use priority::{PriorityOrderer, PriorityTable};
pub use roster::{BattleSide, Formation, Roster, RosterView};
pub use selector::{select_successor, SelectionSource, Successor};
