//! Leaf controls backed by one native widget each.
//!
//! Every widget is created detached and keeps its content locally until its
//! window is created; setters then forward to the backend as well. Widgets
//! that report user input do so through a [`Signal`](crate::Signal) which can
//! be replaced until the window is created.

pub mod button;
pub mod checkbox;
pub mod combobox;
pub mod label;
pub mod line_edit;
pub mod listbox;
pub mod progress;
pub mod spacer;

pub use button::Button;
pub use checkbox::Checkbox;
pub use combobox::Combobox;
pub use label::Label;
pub use line_edit::LineEdit;
pub use listbox::Listbox;
pub use progress::ProgressBar;
pub use spacer::Spacer;
