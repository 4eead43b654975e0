// Résumé compatibility: upload validation, the scoring session state machine,
// remote and simulated scorers, and rendering of the returned report.

pub mod experience;
pub mod handlers;
pub mod report;
pub mod scorer;
pub mod session;
pub mod upload;
