use crate::data::EngineConfig;
use crate::repository::EntityRepository;
use crate::variables::VariableKey;
use good_lp::{Expression, Variable};
use std::collections::BTreeMap;

/// Maximization objective: coverage (one per scheduled class) plus the
/// capability's experience + quality score per scheduled class.
///
/// Both terms are summed unweighted by default; the weights come from the
/// run config (see the note on `EngineConfig` about re-normalizing).
pub fn build(
    repo: &EntityRepository,
    vars: &BTreeMap<VariableKey, Variable>,
    config: &EngineConfig,
) -> Expression {
    let coverage = vars
        .values()
        .fold(Expression::from(0.0), |acc, v| acc + *v);
    let quality = vars.iter().fold(Expression::from(0.0), |acc, (key, v)| {
        match repo.capability(key.capability_id) {
            Some(cap) => {
                let score = (cap.experience_score + cap.quality_score) as f64;
                acc + score * Expression::from(*v)
            }
            None => acc,
        }
    });
    config.coverage_weight * coverage + config.quality_weight * quality
}
