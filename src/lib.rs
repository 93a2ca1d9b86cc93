//! Ranking-point engine for table tennis tournaments.
//!
//! [`scoring::ScoringEngine`] turns a match result (winner and loser ranking)
//! or a final placement into point deltas with an explanation trail. The
//! [`standings`] ledger applies those deltas to season totals.

pub mod config;
pub mod output;
pub mod scoring;
pub mod standings;
