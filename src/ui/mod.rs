/// View functions for the two panels of the main window
///
/// Everything here is a pure function from state to `Element`; all the
/// event handling lives in the application's `update`.
pub mod form;
pub mod list;
