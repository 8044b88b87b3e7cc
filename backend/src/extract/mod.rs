//! Request extractors

mod advice_form;

pub use advice_form::AdviceFormBody;
