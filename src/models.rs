mod ids;
mod note;

pub use ids::{NoteId, SHORT_ID_LEN};
pub use note::{Note, NoteBuilder};
