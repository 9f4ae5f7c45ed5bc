// Output formatting — terminal display of analysis results and status.

pub mod terminal;
