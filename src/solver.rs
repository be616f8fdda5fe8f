use crate::constraints::{self, ModelContext};
use crate::data::{EngineConfig, SchedulingInput, SolveResult, SolveStatus};
use crate::error::EngineError;
use crate::extract::{self, GroupLabeler};
use crate::objective;
use crate::repository::EntityRepository;
use crate::sink::{self, ClassSink};
use crate::variables::{VariableKey, VariableSpace};
use good_lp::{ProblemVariables, ResolutionError, Solution, SolverModel, Variable, default_solver, variable};
use log::info;
use std::collections::BTreeMap;
use std::time::Instant;

/// Runs one scheduling transaction: repository snapshot, variable space,
/// constrained ILP solve, extraction. Always returns a structured result;
/// run-level failures surface as a status plus error strings, never as a
/// bare `Err`.
pub fn solve(input: &SchedulingInput, config: &EngineConfig) -> SolveResult {
    let start_time = Instant::now();

    let (repo, mut warnings) = EntityRepository::build(input);
    let space = VariableSpace::build(&repo);

    if space.is_empty() {
        let err = EngineError::EmptyVariableSpace(format!(
            "{} slots x {} rooms x {} capabilities",
            repo.slot_count(),
            repo.room_count(),
            repo.capability_count()
        ));
        info!("{}", err);
        return SolveResult {
            status: SolveStatus::Unknown,
            generated_classes: vec![],
            warnings,
            errors: vec![err.to_string()],
        };
    }

    // No subject fits any room: no class is realizable at all, which is an
    // over-constrained room inventory rather than a degenerate empty optimum.
    if space
        .keys()
        .iter()
        .all(|k| !constraints::capacity_admissible(&repo, k))
    {
        info!("No candidate variable fits any room; model is infeasible");
        return SolveResult {
            status: SolveStatus::Infeasible,
            generated_classes: vec![],
            warnings,
            errors: vec![EngineError::InfeasibleModel.to_string()],
        };
    }

    // model setup
    info!(
        "Setting up ILP model with {} candidate variables...",
        space.len()
    );
    let mut problem = ProblemVariables::new();
    let raw_vars = problem.add_vector(variable().binary(), space.len());
    let vars: BTreeMap<VariableKey, Variable> =
        space.keys().iter().copied().zip(raw_vars).collect();

    let objective = objective::build(&repo, &vars, config);

    let mut model = problem
        .maximise(objective)
        .using(default_solver)
        .set_option("threads", 1) // single worker for reproducible search
        .set_option("random_seed", config.random_seed as i32)
        .set_option("log_to_console", "false");
    if let Some(budget) = config.time_budget_secs {
        model = model.set_option("time_limit", budget);
    }

    let ctx = ModelContext {
        repo: &repo,
        space: &space,
        vars: &vars,
        config,
    };
    for set in constraints::hard_constraints(&ctx) {
        info!(
            "Adding '{}' constraints ({})...",
            set.name,
            set.constraints.len()
        );
        for c in set.constraints {
            model.add_constraint(c);
        }
    }

    info!("Starting ILP solver...");
    let solution = match model.solve() {
        Ok(s) => s,
        Err(ResolutionError::Infeasible) => {
            return SolveResult {
                status: SolveStatus::Infeasible,
                generated_classes: vec![],
                warnings,
                errors: vec![EngineError::InfeasibleModel.to_string()],
            };
        }
        Err(e) => {
            return SolveResult {
                status: SolveStatus::Unknown,
                generated_classes: vec![],
                warnings,
                errors: vec![EngineError::SolverBudgetExhausted(e.to_string()).to_string()],
            };
        }
    };
    let duration = start_time.elapsed();
    info!("Solution found in {:.2?}", duration);

    // The backend proves optimality on normal termination; a solve that came
    // back after the budget elapsed carries an unproven incumbent.
    let status = match config.time_budget_secs {
        Some(budget) if duration.as_secs_f64() >= budget => SolveStatus::Feasible,
        _ => SolveStatus::Optimal,
    };

    let chosen: Vec<VariableKey> = vars
        .iter()
        .filter(|(_, v)| solution.value(**v) > 0.9)
        .map(|(k, _)| *k)
        .collect();

    let mut labeler = GroupLabeler::seeded(config.random_seed);
    let extraction = extract::extract(&chosen, &repo, config, &mut labeler);
    warnings.extend(extraction.warnings);

    SolveResult {
        status,
        generated_classes: extraction.classes,
        warnings,
        errors: extraction.errors,
    }
}

/// Solve, then hand every generated class to the sink one at a time. A
/// rejected class is recorded and the rest are still persisted.
pub fn solve_and_persist(
    input: &SchedulingInput,
    config: &EngineConfig,
    sink: &mut dyn ClassSink,
) -> SolveResult {
    let mut result = solve(input, config);
    sink::persist_all(sink, &result.generated_classes, &mut result.errors);
    result
}
