//! unified tests
