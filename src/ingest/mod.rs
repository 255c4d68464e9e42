mod reader;
mod table;
mod workbook;

pub use reader::{read_csv, read_input, read_table};
pub use table::{Cell, Table};
pub use workbook::{is_workbook, read_workbook, WORKBOOK_EXTENSIONS};
