// Data models for landmarks, classifier verdicts, camera permission and the pose catalog

pub mod catalog;
pub mod permission;
pub mod pose;
