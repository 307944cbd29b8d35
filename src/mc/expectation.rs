// src/mc/expectation.rs
use crate::autodiff::Scalar;
use crate::distributions::Distribution;
use crate::error::{validation::validate_same_shape, McError, McResult};
use crate::mc::reduce::{reduce_mean, Axes};
use crate::mc::samples::SampleSource;
use ndarray::{ArrayD, Zip};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

/// Log-density callable: `ln p(x)` elementwise
pub type LogProbFn<'a, S> = &'a dyn Fn(&ArrayD<S>) -> ArrayD<S>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectationConfig {
    /// Treat samples as carrying an unbiased gradient. Only the gradient of
    /// the estimate depends on this flag, never its value.
    pub use_reparametrization: bool,
    /// Axes to average
    pub axis: Axes,
    /// Retain averaged axes with length 1
    pub keep_dims: bool,
    /// Name of the tracing scope; `None` means "expectation"
    pub name: Option<String>,
}

impl Default for ExpectationConfig {
    fn default() -> Self {
        ExpectationConfig {
            use_reparametrization: true,
            axis: Axes::sample(),
            keep_dims: false,
            name: None,
        }
    }
}

impl ExpectationConfig {
    /// Validate the estimator configuration
    ///
    /// Axes are checked against the rank of `f(samples)` at reduction time.
    pub fn validate(&self) -> McResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(McError::InvalidConfiguration {
                    field: "name".to_string(),
                    reason: "must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a configuration from TOML
    ///
    /// ```
    /// use monte_carlo::mc::ExpectationConfig;
    ///
    /// let cfg = ExpectationConfig::from_toml_str("use_reparametrization = false").unwrap();
    /// assert!(!cfg.use_reparametrization);
    /// assert!(!cfg.keep_dims);
    /// ```
    pub fn from_toml_str(text: &str) -> McResult<Self> {
        let cfg: ExpectationConfig = toml::from_str(text).map_err(|e| McError::ConfigParse {
            reason: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn scope_name(&self) -> &str {
        self.name.as_deref().unwrap_or("expectation")
    }
}

/// Monte Carlo approximation of `E_p[f(X)]`
///
/// # Math Framework
///
/// ```text
/// E_p[f(X)] ≈ m⁻¹ Σⱼ f(xⱼ),   xⱼ ~iid p(X)
/// ```
/// where `xⱼ` runs over the `config.axis` dimensions of `samples` and `m` is
/// the product of their lengths.
///
/// # Reparameterization and Score-Gradient
///
/// When p is reparameterized (a differentiable transform of parameter-free
/// noise, e.g. `Y = σX + μ, X ~ N(0,1)`), gradient and expectation commute and
/// the tangent of `mean(f(samples))` is already unbiased.
///
/// Otherwise samples carry no gradient and the score-gradient identity is used:
/// ```text
/// ∇E_p[f(X)] = E_p[ ∇f(x) + f(x) ∇ln p(x) ]
/// ```
/// It is realized by rewriting, with `x = stop(samples)`,
/// ```text
/// f(x) ← f(x) + stop(f(x)) · (ln p(x) - stop(ln p(x)))
/// ```
/// The added term is exactly zero in value (IEEE754 gives `y - y == 0` and
/// `y + 0 == y` for finite `y`) while its tangent is `f(x) ∇ln p(x)`.
/// `f` is called exactly once.
///
/// Users are responsible for only setting `use_reparametrization` when `p`
/// really is reparameterized.
///
/// # Errors
///
/// - `MissingLogProb` when `use_reparametrization` is false and `log_prob` is `None`
/// - `InvalidAxis` when `config.axis` does not fit the rank of `f(samples)`
/// - `ShapeMismatch` when `log_prob(x)` and `f(x)` differ in shape
pub fn expectation<S, F>(
    f: F,
    samples: &ArrayD<S>,
    log_prob: Option<LogProbFn<'_, S>>,
    config: &ExpectationConfig,
) -> McResult<ArrayD<S>>
where
    S: Scalar,
    F: Fn(&ArrayD<S>) -> ArrayD<S>,
{
    config.validate()?;
    let span = debug_span!(
        "expectation",
        scope = config.scope_name(),
        use_reparametrization = config.use_reparametrization
    );
    let _enter = span.enter();

    if config.use_reparametrization {
        let fx = f(samples);
        debug!(samples = ?samples.shape(), values = ?fx.shape(), "reparameterized estimate");
        return reduce_mean(&fx, &config.axis, config.keep_dims);
    }

    let log_prob = log_prob.ok_or(McError::MissingLogProb)?;
    let x = samples.mapv(|v| v.stop_gradient());
    let logpx = log_prob(&x);
    let mut fx = f(&x);
    validate_same_shape("log_prob(samples) vs f(samples)", fx.shape(), logpx.shape())?;

    Zip::from(&mut fx).and(&logpx).for_each(|fx, &lp| {
        *fx = *fx + fx.stop_gradient() * (lp - lp.stop_gradient());
    });

    debug!(samples = ?samples.shape(), values = ?fx.shape(), "score-gradient estimate");
    reduce_mean(&fx, &config.axis, config.keep_dims)
}

/// `expectation` with samples and log-density taken from `dist`
///
/// The score-gradient path is used whenever `dist` is not fully
/// reparameterized, regardless of `config.use_reparametrization`.
pub fn expectation_under<S, D, F>(
    f: F,
    dist: &D,
    source: SampleSource<S>,
    config: &ExpectationConfig,
) -> McResult<ArrayD<S>>
where
    S: Scalar,
    D: Distribution<S>,
    F: Fn(&ArrayD<S>) -> ArrayD<S>,
{
    let samples = source.into_samples(dist)?;
    let log_prob = |x: &ArrayD<S>| dist.log_prob_array(x);

    let mut config = config.clone();
    config.use_reparametrization &= dist.reparameterization_type().is_fully_reparameterized();

    expectation(f, &samples, Some(&log_prob), &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autodiff::Dual;
    use crate::distributions::Gamma;
    use ndarray::{arr1, arr2, IxDyn};
    use std::cell::Cell;

    fn square<S: Scalar>(x: &ArrayD<S>) -> ArrayD<S> {
        x.mapv(|v| v * v)
    }

    #[test]
    fn test_default_config() {
        let cfg = ExpectationConfig::default();
        assert!(cfg.use_reparametrization);
        assert_eq!(cfg.axis, Axes::Indices(vec![0]));
        assert!(!cfg.keep_dims);
        assert_eq!(cfg.scope_name(), "expectation");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_config_from_toml() {
        let cfg = ExpectationConfig::from_toml_str(
            r#"
            use_reparametrization = false
            keep_dims = true
            name = "kl"
            axis = { indices = [0, -1] }
            "#,
        )
        .unwrap();
        assert!(!cfg.use_reparametrization);
        assert!(cfg.keep_dims);
        assert_eq!(cfg.scope_name(), "kl");
        assert_eq!(cfg.axis, Axes::Indices(vec![0, -1]));

        let all = ExpectationConfig::from_toml_str(r#"axis = "all""#).unwrap();
        assert_eq!(all.axis, Axes::All);

        assert!(matches!(
            ExpectationConfig::from_toml_str("keep_dims = 3"),
            Err(McError::ConfigParse { .. })
        ));
        assert!(matches!(
            ExpectationConfig::from_toml_str(r#"name = "  ""#),
            Err(McError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_mean_over_sample_axis() {
        let samples = arr1(&[1.0, 2.0, 3.0, 4.0]).into_dyn();
        let est = expectation(square, &samples, None, &ExpectationConfig::default()).unwrap();
        assert_eq!(est.ndim(), 0);
        assert_eq!(est[IxDyn(&[])], 7.5);
    }

    #[test]
    fn test_axis_and_keep_dims() {
        let samples = arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn();
        let cfg = ExpectationConfig {
            axis: Axes::from(1),
            keep_dims: true,
            ..Default::default()
        };
        let est = expectation(|x: &ArrayD<f64>| x.clone(), &samples, None, &cfg).unwrap();
        assert_eq!(est, arr2(&[[1.5], [3.5]]).into_dyn());

        let all = ExpectationConfig {
            axis: Axes::All,
            ..Default::default()
        };
        let est = expectation(|x: &ArrayD<f64>| x.clone(), &samples, None, &all).unwrap();
        assert_eq!(est[IxDyn(&[])], 2.5);
    }

    #[test]
    fn test_repeated_axis_is_invalid_axis() {
        let samples = arr1(&[1.0, 2.0]).into_dyn();
        for axis in [vec![0, 0], vec![0, -1]] {
            let cfg = ExpectationConfig {
                axis: Axes::from(axis.clone()),
                ..Default::default()
            };
            assert!(
                matches!(
                    expectation(square, &samples, None, &cfg),
                    Err(McError::InvalidAxis { ndim: 1, .. })
                ),
                "axis {:?}",
                axis
            );
        }
    }

    #[test]
    fn test_missing_log_prob() {
        let samples = arr1(&[1.0, 2.0]).into_dyn();
        let cfg = ExpectationConfig {
            use_reparametrization: false,
            ..Default::default()
        };
        assert_eq!(
            expectation(square, &samples, None, &cfg),
            Err(McError::MissingLogProb)
        );
    }

    #[test]
    fn test_log_prob_shape_mismatch() {
        let samples = arr1(&[1.0, 2.0]).into_dyn();
        let cfg = ExpectationConfig {
            use_reparametrization: false,
            ..Default::default()
        };
        let bad_log_prob = |_: &ArrayD<f64>| arr1(&[0.0]).into_dyn();
        assert!(matches!(
            expectation(square, &samples, Some(&bad_log_prob), &cfg),
            Err(McError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_score_gradient_calls_f_once_and_keeps_value() {
        let samples = arr1(&[0.5, 1.5, 2.5]).into_dyn().mapv(Dual::constant);
        let calls = Cell::new(0);
        let f = |x: &ArrayD<Dual>| {
            calls.set(calls.get() + 1);
            square(x)
        };
        let log_prob = |x: &ArrayD<Dual>| x.mapv(|v| -v * Dual::variable(1.0));

        let reparam = expectation(&f, &samples, None, &ExpectationConfig::default()).unwrap();
        let score = expectation(
            &f,
            &samples,
            Some(&log_prob),
            &ExpectationConfig {
                use_reparametrization: false,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(reparam[IxDyn(&[])].value(), score[IxDyn(&[])].value());
        assert_eq!(reparam[IxDyn(&[])].tangent(), 0.0);
        // tangent = mean(f(x) · d/dθ[-θx]) = -mean(x³)
        let expected = -(0.125 + 3.375 + 15.625) / 3.0;
        assert!((score[IxDyn(&[])].tangent() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_score_gradient_stops_sample_gradient() {
        let samples = arr1(&[1.0, 2.0]).into_dyn().mapv(Dual::variable);
        let log_prob = |x: &ArrayD<Dual>| x.mapv(|_| Dual::constant(0.0));
        let cfg = ExpectationConfig {
            use_reparametrization: false,
            ..Default::default()
        };
        let est = expectation(square, &samples, Some(&log_prob), &cfg).unwrap();
        assert_eq!(est[IxDyn(&[])], Dual::constant(2.5));
    }

    #[test]
    fn test_expectation_under_forces_score_gradient() {
        let dist = Gamma::new(Dual::constant(2.0), Dual::variable(3.0)).unwrap();
        let cfg = ExpectationConfig::default();
        let est = expectation_under(
            |x: &ArrayD<Dual>| x.clone(),
            &dist,
            SampleSource::Draw { n: 20_000, seed: 9 },
            &cfg,
        )
        .unwrap();
        let mean = est[IxDyn(&[])];
        // E[X] = α/β and d/dβ E[X] = -α/β²
        assert!((mean.value() - 2.0 / 3.0).abs() < 0.02, "mean {}", mean);
        assert!((mean.tangent() + 2.0 / 9.0).abs() < 0.05, "gradient {}", mean);
    }
}
