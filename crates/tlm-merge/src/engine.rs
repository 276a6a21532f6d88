use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tlm_source::{Sink, Source};

use crate::bounded::BoundedMerge;
use crate::config::MergeConfig;
use crate::eager::EagerMerge;
use crate::error::{MergeError, MergeResult};
use crate::report::MergeReport;

/// Which merge strategy to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Heap over every source at once.
    Eager,
    /// Linear scan over a capped active set.
    #[default]
    Bounded,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eager => "eager",
            Self::Bounded => "bounded",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Engine {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(Self::Eager),
            "bounded" => Ok(Self::Bounded),
            _ => Err(MergeError::UnknownEngine(s.to_string())),
        }
    }
}

/// Run the selected engine over `sources`.
///
/// `config` is validated for both engines so a bad capacity is caught
/// whichever engine is picked.
pub async fn merge<S, K>(
    engine: Engine,
    config: &MergeConfig,
    sources: Vec<S>,
    sink: &mut K,
) -> MergeResult<MergeReport>
where
    S: Source,
    K: Sink + ?Sized,
{
    config.validate()?;
    match engine {
        Engine::Eager => EagerMerge::new().merge(sources, sink).await,
        Engine::Bounded => BoundedMerge::new(config.clone())?.merge(sources, sink).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlm_source::{VecSink, VecSource};

    #[test]
    fn parse_and_display() {
        assert_eq!("eager".parse::<Engine>().unwrap(), Engine::Eager);
        assert_eq!(" Bounded ".parse::<Engine>().unwrap(), Engine::Bounded);
        assert_eq!(Engine::Eager.to_string(), "eager");
        assert!(matches!(
            "heap".parse::<Engine>(),
            Err(MergeError::UnknownEngine(name)) if name == "heap"
        ));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Engine::Bounded).unwrap(), "\"bounded\"");
        let engine: Engine = serde_json::from_str("\"eager\"").unwrap();
        assert_eq!(engine, Engine::Eager);
        assert_eq!(Engine::default(), Engine::Bounded);
    }

    #[tokio::test]
    async fn dispatches_to_both_engines() {
        for engine in [Engine::Eager, Engine::Bounded] {
            let mut sink = VecSink::new();
            let report = merge(
                engine,
                &MergeConfig::default(),
                vec![VecSource::from_millis([5]), VecSource::from_millis([1, 3])],
                &mut sink,
            )
            .await
            .unwrap();
            assert_eq!(sink.timestamps(), vec![1, 3, 5], "engine {engine}");
            assert_eq!(report.emitted, 3);
        }
    }

    #[tokio::test]
    async fn invalid_capacity_rejected_for_eager_too() {
        let mut sink = VecSink::new();
        let err = merge(
            Engine::Eager,
            &MergeConfig::with_capacity(0),
            Vec::<VecSource>::new(),
            &mut sink,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MergeError::InvalidCapacity(0)));
        assert!(!sink.is_complete());
    }
}
