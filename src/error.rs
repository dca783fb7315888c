use thiserror::Error;

use crate::input::inference::InferenceError;
use crate::pipeline::stage1_prepare::PrepareError;
use crate::pipeline::stage3_evaluate::EvaluateError;
use crate::pipeline::stage4_persist::PersistError;
use crate::report::AggregateError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Prepare(#[from] PrepareError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}
