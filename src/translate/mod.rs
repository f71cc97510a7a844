//! Utterance translation.
//!
//! A [`Translator`] turns finalized utterance text into target-language
//! text; the [`TranslationCoordinator`] ties each asynchronous result back
//! to the conversation entry that requested it, by identity rather than
//! position, so responses arriving out of request order still land on the
//! right entry.

pub mod client;
pub mod coordinator;
pub mod translator;

pub use client::HttpTranslator;
pub use coordinator::{TranslationCoordinator, TranslationOutcome};
pub use translator::{MockTranslator, PendingTranslation, PendingTranslations, Translator};
