//! Library integration tests running real builds with local commands.

mod build_tests;
