mod sections_table;
mod speed_controls;

pub use sections_table::SectionsTable;
pub use speed_controls::SpeedControls;
