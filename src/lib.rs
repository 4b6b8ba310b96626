//! Hordecast
//!
//! Generation core for a news bot that rewrites RSS articles through the
//! AI Horde asynchronous text-generation API and illustrates them through
//! the asynchronous image-generation API: a submit/poll job client, a
//! model- and prompt-substitution fallback ladder, and the content pipeline
//! that composes them.

pub mod config;
pub mod models;
pub mod services;
