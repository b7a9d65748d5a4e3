//! Property suite entry point.

mod progress_props;
