pub mod add;
pub mod clear;
pub mod duplicate;
pub mod edit;
pub mod export;
pub mod last;
pub mod new;
pub mod remove;
pub mod show;
pub mod study;
pub mod theme;
