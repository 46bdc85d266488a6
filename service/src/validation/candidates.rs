//! Candidates range validation of selective procedures.

use crate::domain::tender::SecondStage;

use super::Error;

/// Checks the candidates range of the [`SecondStage`].
///
/// # Errors
///
/// - With [`Error::MissingRequiredAttribute`] if neither bound is set.
/// - With [`Error::InvalidRange`] if any bound is zero, or the minimum is
///   not less than the maximum.
pub fn range(second_stage: Option<&SecondStage>) -> Result<(), Error> {
    let (min, max) = match second_stage {
        Some(SecondStage {
            minimum_candidates: min,
            maximum_candidates: max,
        }) if min.is_some() || max.is_some() => (*min, *max),
        Some(_) | None => {
            return Err(Error::MissingRequiredAttribute(
                "tender.secondStage.minimumCandidates or \
                 tender.secondStage.maximumCandidates"
                    .into(),
            ));
        }
    };

    if min == Some(0) || max == Some(0) {
        return Err(Error::InvalidRange(
            "number of candidates must be positive".into(),
        ));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min >= max {
            return Err(Error::InvalidRange(format!(
                "minimum candidates `{min}` must be less than maximum `{max}`",
            )));
        }
    }
    Ok(())
}
