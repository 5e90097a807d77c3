mod common;
mod preview;
