//! Test utilities for the bottom sheet engine.
//!
//! # Overview
//!
//! - [`MockContent`] - presentable content that records every call the
//!   engine makes on it, optionally with an embedded scroll view
//! - [`RecordingDismissalHandler`] - a dismissal handler with a switchable
//!   permission that records its calls
//! - [`CallCounter`] / [`StateRecorder`] - shared counters for completions and
//!   drawer delegates
//! - fixtures: screen environments, pan sequences and a frame driver
//!
//! # Example
//!
//! ```rust
//! use bottomsheet::{ModalPresenter, SheetConfiguration};
//! use bottomsheet_test_utils::{MockContent, phone, run_until_idle};
//!
//! let content = MockContent::new(300.0).into_handle();
//! let mut presenter = ModalPresenter::new(phone());
//! presenter.present_bottom_sheet(content.handle(), SheetConfiguration::new(), || true, None, true);
//! run_until_idle(&mut presenter);
//!
//! assert!(presenter.is_presented(content.id()));
//! assert_eq!(content.count_style_applications(), 1);
//! ```
//!
//! # Interior Mutability
//!
//! The engine owns the content through a `Rc<RefCell<..>>`. Recorded calls
//! live in a separate `Arc<Mutex<..>>` so tests can inspect them without
//! borrowing the content while the engine might.

pub mod content;
pub mod dismissal;
pub mod fixtures;

pub use content::{ContentCall, MockContent, MockContentHandle};
pub use dismissal::{CallCounter, DismissalCall, RecordingDismissalHandler, StateRecorder};
pub use fixtures::{
    FRAME, landscape_phone, pan_sequence, phone, phone_with_safe_area, run_frames, run_until_idle,
};
