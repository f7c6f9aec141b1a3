pub mod dashboard;
pub mod record_editor;
pub mod record_list;

pub use dashboard::Dashboard;
pub use record_editor::{EditorMode, EditorSession, RecordEditor};
pub use record_list::{FetchTicket, ListFilters, ListQuery, RecordList};
