//! Core ticket model and lifecycle rules
//!
//! Everything in this module is pure: no I/O, no clock reads. Time is passed
//! in explicitly so transitions and countdowns are deterministic.

mod builders;
pub mod clock;
mod countdown;
pub mod duration;
mod lifecycle;
mod response;
mod status;
mod ticket;
mod validation;

pub use builders::TicketBuilder;
pub use clock::{Clock, FixedClock, SystemClock};
pub use countdown::ClosureCountdown;
pub use lifecycle::{
    DEFAULT_REOPEN_NOTE, ResolvedAtUpdate, TicketPatch, Transition, closure_note,
    is_due_for_closure, open_ticket,
};
pub use response::{FollowUpKind, Response, Responses};
pub use status::{Action, Status};
pub use ticket::{Category, Owner, Ticket, TicketId, reference_for};
pub use validation::{
    NewTicket, ValidationRules, normalize_attachment, validate_description, validate_response,
};
