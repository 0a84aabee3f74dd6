/// The arc decomposition's result type.
pub type DecompositionResult = Result<(), DecompositionError>;

/// Describes why an arc decomposition did not run to completion.
#[derive(Clone, Debug, PartialEq)]
pub enum DecompositionError {
    /// The curve sink refused a curve. Curves emitted before it are not taken back.
    SinkAborted,
    UnsupportedParameter(UnsupportedParameter),
}

#[cfg(feature = "std")]
impl core::fmt::Display for DecompositionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecompositionError::SinkAborted => {
                std::write!(f, "The curve sink aborted the decomposition")
            }
            DecompositionError::UnsupportedParameter(e) => {
                std::write!(f, "Unsupported parameter: {e}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecompositionError {}

impl core::convert::From<UnsupportedParameter> for DecompositionError {
    fn from(value: UnsupportedParameter) -> Self {
        Self::UnsupportedParameter(value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedParameter {
    PositionIsNaN,
    RadiusIsNaN,
    RadiusIsInfinite,
    NegativeRadius,
    AngleIsNaN,
    AngleIsInfinite,
    ToleranceIsNaN,
    ToleranceIsNotPositive,
}

#[cfg(feature = "std")]
impl core::fmt::Display for UnsupportedParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UnsupportedParameter::PositionIsNaN => {
                std::write!(f, "Position is not a number")
            }
            UnsupportedParameter::RadiusIsNaN => {
                std::write!(f, "Radius is not a number")
            }
            UnsupportedParameter::RadiusIsInfinite => {
                std::write!(f, "Radius is infinite")
            }
            UnsupportedParameter::NegativeRadius => {
                std::write!(f, "Radius is negative")
            }
            UnsupportedParameter::AngleIsNaN => {
                std::write!(f, "Angle is not a number")
            }
            UnsupportedParameter::AngleIsInfinite => {
                std::write!(f, "Angle is infinite")
            }
            UnsupportedParameter::ToleranceIsNaN => {
                std::write!(f, "Tolerance threshold is not a number")
            }
            UnsupportedParameter::ToleranceIsNotPositive => {
                std::write!(f, "Tolerance threshold must be greater than zero")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnsupportedParameter {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn display() {
        let err: DecompositionError = UnsupportedParameter::ToleranceIsNaN.into();
        assert_eq!(
            err.to_string(),
            "Unsupported parameter: Tolerance threshold is not a number"
        );
        assert_eq!(
            DecompositionError::SinkAborted.to_string(),
            "The curve sink aborted the decomposition"
        );
    }
}
