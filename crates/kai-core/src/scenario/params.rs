//! Parameter genes: typed values, rendering, and mutation rules.

use serde::{Deserialize, Serialize};

use crate::rng::RngHandle;

/// Lower clamp for intensity-percentage mutation.
pub const INTENSITY_MIN: i64 = 20;
/// Upper clamp for intensity-percentage mutation.
pub const INTENSITY_MAX: i64 = 100;

/// Closed tagged union over the value types a parameter may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer payload.
    Int(i64),
    /// Floating point payload.
    Float(f64),
    /// String payload.
    Str(String),
}

/// How a parameter value is rendered for the external tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RenderRule {
    /// Render the value as-is.
    #[default]
    Plain,
    /// Render with a `%` suffix (intensity percentages).
    Percent,
}

/// Per-kind mutation rule. Each rule operates only within its own value
/// variant; a rule applied to a foreign variant leaves the value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MutationRule {
    /// Grow by up to 35% or shrink by up to 25% of the current value,
    /// truncated to an integer and clamped to `[20, 100]`.
    IntensityPercent,
    /// Uniform integer draw from the half-open range `[lo, hi)`.
    UniformInt {
        /// Inclusive lower bound.
        lo: i64,
        /// Exclusive upper bound.
        hi: i64,
    },
    /// Uniform choice from a fixed list.
    OneOf {
        /// Candidate values.
        choices: Vec<String>,
    },
}

/// A single mutable gene: name, typed value, external-tool alias, and the
/// rules governing rendering and mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Default name, unique within the owning scenario.
    pub name: String,
    /// Current value.
    pub value: ParamValue,
    /// Alias used by the CLI backend, when it differs from `name`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ctl_alias: Option<String>,
    /// Value rendering rule.
    #[serde(default)]
    pub render: RenderRule,
    /// Optional mutation rule.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mutation: Option<MutationRule>,
}

impl Parameter {
    fn new(name: &str, value: ParamValue) -> Self {
        Self {
            name: name.to_string(),
            value,
            ctl_alias: None,
            render: RenderRule::Plain,
            mutation: None,
        }
    }

    fn with_alias(mut self, alias: &str) -> Self {
        self.ctl_alias = Some(alias.to_string());
        self
    }

    fn with_render(mut self, render: RenderRule) -> Self {
        self.render = render;
        self
    }

    fn with_mutation(mut self, rule: MutationRule) -> Self {
        self.mutation = Some(rule);
        self
    }

    /// Returns the external-tool alias if set, else the default name.
    pub fn effective_name(&self) -> &str {
        self.ctl_alias.as_deref().unwrap_or(&self.name)
    }

    /// Raw (rule-free) string form of the current value, used for identity.
    pub fn value_string(&self) -> String {
        match &self.value {
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Float(v) => v.to_string(),
            ParamValue::Str(v) => v.clone(),
        }
    }

    /// Renders the current value according to the rendering rule.
    pub fn render_value(&self) -> String {
        let raw = self.value_string();
        match self.render {
            RenderRule::Plain => raw,
            RenderRule::Percent => format!("{raw}%"),
        }
    }

    /// Replaces the value with a string payload.
    pub fn set_string(&mut self, value: impl Into<String>) {
        self.value = ParamValue::Str(value.into());
    }

    /// Replaces the value with an integer payload.
    pub fn set_int(&mut self, value: i64) {
        self.value = ParamValue::Int(value);
    }

    /// Returns the integer payload, when the value carries one.
    pub fn int_value(&self) -> Option<i64> {
        match self.value {
            ParamValue::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string payload, when the value carries one.
    pub fn str_value(&self) -> Option<&str> {
        match &self.value {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Mutates the value in place under the parameter's rule.
    ///
    /// A pure function of the current value and the random source: no other
    /// object is touched, and the declared domain bounds are enforced.
    /// Reproducible under a seeded [`RngHandle`].
    pub fn mutate(&mut self, rng: &mut RngHandle) {
        let Some(rule) = self.mutation.clone() else {
            return;
        };
        match rule {
            MutationRule::IntensityPercent => {
                if let ParamValue::Int(current) = self.value {
                    let current = current as f64;
                    let next = if rng.chance(0.5) {
                        current + rng.int_below(1, 35) as f64 * current / 100.0
                    } else {
                        current - rng.int_below(1, 25) as f64 * current / 100.0
                    };
                    let next = (next.trunc() as i64).clamp(INTENSITY_MIN, INTENSITY_MAX);
                    self.value = ParamValue::Int(next);
                }
            }
            MutationRule::UniformInt { lo, hi } => {
                if matches!(self.value, ParamValue::Int(_)) {
                    self.value = ParamValue::Int(rng.int_below(lo, hi));
                }
            }
            MutationRule::OneOf { choices } => {
                if matches!(self.value, ParamValue::Str(_)) {
                    if let Some(choice) = rng.pick(&choices) {
                        self.value = ParamValue::Str(choice.clone());
                    }
                }
            }
        }
    }

    // Catalogue of the well-known parameters bound by the scenario kinds.

    /// `NAMESPACE` — target namespace name.
    pub fn namespace() -> Self {
        Self::new("NAMESPACE", ParamValue::Str(String::new()))
    }

    /// `POD_LABEL` — pod label selector, `key=value`.
    pub fn pod_label() -> Self {
        Self::new("POD_LABEL", ParamValue::Str(String::new()))
    }

    /// `NAME_PATTERN` — pod name regex, match-all by default.
    pub fn name_pattern() -> Self {
        Self::new("NAME_PATTERN", ParamValue::Str(".*".to_string()))
    }

    /// `DISRUPTION_COUNT` — number of targets disrupted at once.
    pub fn disruption_count() -> Self {
        Self::new("DISRUPTION_COUNT", ParamValue::Int(1))
    }

    /// `KILL_TIMEOUT` — seconds to wait for a kill to take effect.
    pub fn kill_timeout() -> Self {
        Self::new("KILL_TIMEOUT", ParamValue::Int(60))
    }

    /// `EXPECTED_RECOVERY_TIME` — seconds the workload may take to recover.
    pub fn expected_recovery_time() -> Self {
        Self::new("EXPECTED_RECOVERY_TIME", ParamValue::Int(60))
    }

    /// `DURATION` — chaos duration in seconds.
    pub fn duration() -> Self {
        Self::new("DURATION", ParamValue::Int(60)).with_alias("chaos-duration")
    }

    /// `POD_SELECTOR` — pod selector in `{key: value}` form.
    pub fn pod_selector() -> Self {
        Self::new("POD_SELECTOR", ParamValue::Str(String::new()))
    }

    /// `BLOCK_TRAFFIC_TYPE` — traffic directions to block.
    pub fn block_traffic_type() -> Self {
        Self::new(
            "BLOCK_TRAFFIC_TYPE",
            ParamValue::Str("[Ingress, Egress]".to_string()),
        )
        .with_mutation(MutationRule::OneOf {
            choices: vec![
                "[Ingress, Egress]".to_string(),
                "[Ingress]".to_string(),
                "[Egress]".to_string(),
            ],
        })
    }

    /// `LABEL_SELECTOR` — generic label selector, `key=value`.
    pub fn label_selector() -> Self {
        Self::new("LABEL_SELECTOR", ParamValue::Str(String::new()))
    }

    /// `CONTAINER_NAME` — container filter inside the target pod.
    pub fn container_name() -> Self {
        Self::new("CONTAINER_NAME", ParamValue::Str(String::new()))
    }

    /// `ACTION` — kill signal sent to the container.
    pub fn signal_action() -> Self {
        Self::new("ACTION", ParamValue::Str("1".to_string())).with_mutation(MutationRule::OneOf {
            choices: vec!["1".to_string(), "9".to_string()],
        })
    }

    /// `TOTAL_CHAOS_DURATION` — hog run length in seconds.
    pub fn total_chaos_duration() -> Self {
        Self::new("TOTAL_CHAOS_DURATION", ParamValue::Int(60)).with_alias("chaos-duration")
    }

    /// `NODE_CPU_CORE` — cores stressed by the CPU hog.
    pub fn node_cpu_cores() -> Self {
        Self::new("NODE_CPU_CORE", ParamValue::Float(2.0)).with_alias("cores")
    }

    /// `NODE_CPU_PERCENTAGE` — CPU usage intensity in `[20, 100]`.
    pub fn node_cpu_percentage() -> Self {
        Self::new("NODE_CPU_PERCENTAGE", ParamValue::Int(50))
            .with_alias("cpu-percentage")
            .with_mutation(MutationRule::IntensityPercent)
    }

    /// `MEMORY_CONSUMPTION_PERCENTAGE` — memory intensity in `[20, 100]`,
    /// rendered with a `%` suffix.
    pub fn node_memory_percentage() -> Self {
        Self::new("MEMORY_CONSUMPTION_PERCENTAGE", ParamValue::Int(50))
            .with_alias("memory-consumption")
            .with_render(RenderRule::Percent)
            .with_mutation(MutationRule::IntensityPercent)
    }

    /// `NUMBER_OF_WORKERS` — hog worker count.
    pub fn workers() -> Self {
        Self::new("NUMBER_OF_WORKERS", ParamValue::Int(1))
            .with_alias("memory-workers")
            .with_mutation(MutationRule::UniformInt { lo: 1, hi: 10 })
    }

    /// `NODE_SELECTOR` — node targeting selector, `key=value`.
    pub fn node_selector() -> Self {
        Self::new("NODE_SELECTOR", ParamValue::Str(String::new()))
    }

    /// `TAINTS` — taints the hog pod must tolerate, as a bracketed list.
    pub fn taints() -> Self {
        Self::new("TAINTS", ParamValue::Str("[]".to_string()))
    }

    /// `NUMBER_OF_NODES` — how many matching nodes to stress.
    pub fn number_of_nodes() -> Self {
        Self::new("NUMBER_OF_NODES", ParamValue::Int(1))
    }

    /// `IMAGE` — hog workload image.
    pub fn hog_image() -> Self {
        Self::new(
            "IMAGE",
            ParamValue::Str("quay.io/krkn-chaos/krkn-hog".to_string()),
        )
    }

    /// `OBJECT_TYPE` — skew target, pod or node.
    pub fn object_type() -> Self {
        Self::new("OBJECT_TYPE", ParamValue::Str(String::new())).with_mutation(
            MutationRule::OneOf {
                choices: vec!["pod".to_string(), "node".to_string()],
            },
        )
    }

    /// `ACTION` — clock skew action.
    pub fn time_action() -> Self {
        Self::new("ACTION", ParamValue::Str("skew_date".to_string())).with_mutation(
            MutationRule::OneOf {
                choices: vec!["skew_date".to_string(), "skew_time".to_string()],
            },
        )
    }

    /// Canned parameter carried by the dummy anchor scenario.
    pub fn dummy(name: &str, value: i64) -> Self {
        Self::new(name, ParamValue::Int(value))
    }
}
