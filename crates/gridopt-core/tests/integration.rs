#![allow(clippy::float_cmp)]

//! End-to-end scenarios: build a model, export the matrix view, and
//! check solve write-back against a fixture adapter.

use gridopt_core::{
    ConLabel, ConstantLike, CoordInput, DimIndex, Key, LabeledArray, MatrixView, Model, Sense,
    SolverAdapter, SolverConfig, SolverError, SolverOutcome, SolverStatus, VarLabel, VariableSpec,
};

/// Adapter returning a canned primal vector, the way a back-end would.
struct FixtureAdapter {
    primals: Vec<f64>,
}

impl SolverAdapter for FixtureAdapter {
    fn id(&self) -> &str {
        "fixture"
    }

    fn solve(
        &mut self,
        view: &MatrixView,
        _config: &SolverConfig,
    ) -> Result<SolverOutcome, SolverError> {
        if view.vars.is_empty() {
            return Err(SolverError::EmptyModel);
        }
        let objective_value = self
            .primals
            .iter()
            .zip(&view.objective)
            .map(|(x, c)| x * c)
            .sum();
        Ok(SolverOutcome {
            status: SolverStatus::Optimal,
            objective_value,
            primals: self.primals.clone(),
            duals: None,
        })
    }
}

/// Basic LP: two scalar variables, two constraints, linear objective.
#[test]
fn test_basic_lp_matrix_and_solve() {
    let mut model = Model::new();
    let x = model
        .add_variables(VariableSpec::new().lower(0.0).name("x"))
        .unwrap();
    let y = model
        .add_variables(VariableSpec::new().lower(0.0).name("y"))
        .unwrap();

    let first = model
        .linexpr(&[
            (ConstantLike::Scalar(3.0), &x),
            (ConstantLike::Scalar(7.0), &y),
        ])
        .unwrap();
    model
        .add_constraints(first.ge_scalar(10.0), None, None)
        .unwrap();
    let second = model
        .linexpr(&[
            (ConstantLike::Scalar(5.0), &x),
            (ConstantLike::Scalar(2.0), &y),
        ])
        .unwrap();
    model
        .add_constraints(second.ge_scalar(3.0), None, None)
        .unwrap();
    let objective = model
        .linexpr(&[
            (ConstantLike::Scalar(1.0), &x),
            (ConstantLike::Scalar(2.0), &y),
        ])
        .unwrap();
    model.add_objective(objective.sum(), Sense::Minimize).unwrap();

    let view = model.to_matrix_view().unwrap();
    assert_eq!(view.vars, vec![VarLabel::new(0), VarLabel::new(1)]);
    assert_eq!(view.lower, vec![0.0, 0.0]);
    assert_eq!(view.dense_matrix(), vec![vec![3.0, 7.0], vec![5.0, 2.0]]);
    assert_eq!(view.rhs, vec![10.0, 3.0]);
    assert!(view
        .senses
        .iter()
        .all(|s| *s == gridopt_core::ComparisonSense::GreaterEqual));
    assert_eq!(view.objective, vec![1.0, 2.0]);

    // Known optimum: x = 0, y = 10/7, objective 20/7.
    let mut adapter = FixtureAdapter {
        primals: vec![0.0, 10.0 / 7.0],
    };
    let status = model.solve(&mut adapter, &SolverConfig::new()).unwrap();
    assert!(status.is_optimal());
    assert!((model.objective_value().unwrap() - 20.0 / 7.0).abs() < 1e-12);
    assert_eq!(model.solution("x").unwrap().item(), Some(&0.0));
    assert_eq!(model.solution("y").unwrap().item(), Some(&(10.0 / 7.0)));
}

/// Dimensioned LP: families over a time index, rhs scaled per step.
#[test]
fn test_dimensioned_families_row_structure() {
    let time = DimIndex::range("time", 10);
    let mut model = Model::new();
    let x = model
        .add_variables(VariableSpec::new().lower(0.0).coords([time.clone()]).name("x"))
        .unwrap();
    let y = model
        .add_variables(VariableSpec::new().lower(0.0).coords([time.clone()]).name("y"))
        .unwrap();

    let factor =
        LabeledArray::from_vec(time.clone(), (0..10).map(f64::from).collect()).unwrap();
    let first = model
        .linexpr(&[
            (ConstantLike::Scalar(3.0), &x),
            (ConstantLike::Scalar(7.0), &y),
        ])
        .unwrap();
    model
        .add_constraints(first.ge_array(&factor.scale(10.0)).unwrap(), None, None)
        .unwrap();
    let second = model
        .linexpr(&[
            (ConstantLike::Scalar(5.0), &x),
            (ConstantLike::Scalar(2.0), &y),
        ])
        .unwrap();
    model
        .add_constraints(second.ge_array(&factor.scale(3.0)).unwrap(), None, None)
        .unwrap();
    let objective = model
        .linexpr(&[
            (ConstantLike::Scalar(1.0), &x),
            (ConstantLike::Scalar(2.0), &y),
        ])
        .unwrap();
    model.add_objective(objective.sum(), Sense::Minimize).unwrap();

    let view = model.to_matrix_view().unwrap();
    assert_eq!(view.num_variables(), 20);
    assert_eq!(view.num_constraints(), 20);

    // Row i of the first family: 3 on x[i], 7 on y[i], rhs 10*i.
    for i in 0..10i64 {
        let row = ConLabel::new(i);
        assert!(view
            .entries
            .contains(&(row, VarLabel::new(i), 3.0)));
        assert!(view
            .entries
            .contains(&(row, VarLabel::new(10 + i), 7.0)));
        let position = view.row_position(row).unwrap();
        assert_eq!(view.rhs[position], 10.0 * i as f64);
    }
}

/// Disjoint labeled bounds broadcast to the outer-product shape.
#[test]
fn test_broadcast_bounds_family() {
    let mut model = Model::new();
    let lower = LabeledArray::from_vec(DimIndex::range("a", 2), vec![1.0, 1.0]).unwrap();
    let upper = LabeledArray::from_vec(DimIndex::range("b", 2), vec![10.0, 12.0]).unwrap();
    let x = model
        .add_variables(VariableSpec::new().lower(lower).upper(upper))
        .unwrap();
    assert_eq!(x.shape(), &[2, 2]);

    let view = model.to_matrix_view().unwrap();
    assert_eq!(view.num_variables(), 4);
    assert_eq!(view.lower, vec![1.0; 4]);
    assert_eq!(view.upper, vec![10.0, 12.0, 10.0, 12.0]);
}

/// Shifted difference constrained on the interior coordinates.
#[test]
fn test_shift_difference_constraints() {
    let time = DimIndex::range("time", 10);
    let mut model = Model::new();
    let y = model
        .add_variables(VariableSpec::new().lower(0.0).coords([time.clone()]).name("y"))
        .unwrap();

    let interior: Vec<Key> = (1..10i64).map(Key::Int).collect();
    let lhs = (&y - &y.shift("time", 1).unwrap())
        .sel("time", &interior)
        .unwrap();
    let constraint = model
        .add_constraints(lhs.le_scalar(0.5), Some("ramp"), None)
        .unwrap();
    assert_eq!(constraint.shape(), &[9]);

    let view = model.to_matrix_view().unwrap();
    assert_eq!(view.num_constraints(), 9);
    // Every row pairs y[t] with y[t-1]; the boundary sentinel never made
    // it past the selection.
    assert_eq!(view.num_entries(), 18);
    assert!(view.entries.contains(&(ConLabel::new(0), VarLabel::new(1), 1.0)));
    assert!(view.entries.contains(&(ConLabel::new(0), VarLabel::new(0), -1.0)));
    assert!(view.entries.contains(&(ConLabel::new(8), VarLabel::new(9), 1.0)));
    assert!(view.entries.contains(&(ConLabel::new(8), VarLabel::new(8), -1.0)));
}

/// Anonymous dims are rejected when the model demands names.
#[test]
fn test_force_dim_names_rejects_bare_coords() {
    let mut model = Model::with_force_dim_names();
    let err = model
        .add_variables(
            VariableSpec::new()
                .lower(vec![1.0, 2.0])
                .coords([CoordInput::Keys(vec![Key::Int(0), Key::Int(1)])]),
        )
        .unwrap_err();
    assert_eq!(err.code(), "MODEL_UNNAMED_DIMENSION");
}

/// Rule builder over a two-dimensional coordinate product.
#[test]
fn test_rule_builder_references_shifted_labels() {
    let mut model = Model::new();
    let rows: Vec<Key> = (0..10i64).map(Key::Int).collect();
    let cols: Vec<Key> = vec![Key::from("a"), Key::from("b")];
    let b = model
        .add_variables(
            VariableSpec::new()
                .lower(0.0)
                .coords([CoordInput::Keys(rows.clone()), CoordInput::Keys(cols.clone())])
                .name("b"),
        )
        .unwrap();

    let expr = model
        .linexpr_rule(
            &[CoordInput::Keys(rows), CoordInput::Keys(cols)],
            |_, point| {
                let i = match &point[0] {
                    Key::Int(i) => *i,
                    Key::Str(_) => 0,
                };
                let j = point[1].clone();
                if i % 2 == 1 {
                    let handle = b.at(&[Key::Int(i - 1), j]).unwrap();
                    handle.to_expr((i - 1) as f64)
                } else {
                    let handle = b.at(&[Key::Int(i), j]).unwrap();
                    handle.to_expr(i as f64)
                }
            },
        )
        .unwrap();

    assert_eq!(expr.outer_shape(), &[10, 2]);
    assert_eq!(expr.n_terms(), 1);
    // At (3, "a") the rule picked 2 * b[2, "a"], whose label is 4.
    let at = [Key::Int(3), Key::from("a"), Key::Int(0)];
    assert_eq!(expr.coeffs().get(&at).unwrap(), &2.0);
    assert_eq!(expr.vars().get(&at).unwrap(), &4);
}

/// Summed duplicates evaluate to the same product as the raw terms.
#[test]
fn test_duplicate_summation_preserves_matrix_product() {
    let time = DimIndex::range("time", 3);
    let mut model = Model::new();
    let x = model
        .add_variables(VariableSpec::new().lower(0.0).coords([time]).name("x"))
        .unwrap();

    // x + 2x carries duplicate labels per row until export.
    let expr = x.to_linexpr(1.0).add(&x.to_linexpr(2.0)).unwrap();
    model
        .add_constraints(expr.clone().ge_scalar(1.0), None, None)
        .unwrap();
    let view = model.to_matrix_view().unwrap();

    let point = vec![2.0, -1.0, 0.5];
    let summed = view.matrix_vector_product(&point);

    // Raw triplet evaluation straight off the expression arrays.
    let labels = expr.vars().ravel();
    let coeffs = expr.coeffs().ravel();
    let n_terms = expr.n_terms();
    let mut raw = vec![0.0; 3];
    for (flat, (label, coeff)) in labels.iter().zip(coeffs).enumerate() {
        if *label < 0 {
            continue;
        }
        raw[flat / n_terms] += coeff * point[*label as usize];
    }
    assert_eq!(summed, raw);
}

/// Rebuilding with the same call sequence reproduces labels exactly.
#[test]
fn test_label_determinism_across_rebuilds() {
    let build = || {
        let time = DimIndex::range("time", 4);
        let mut model = Model::new();
        let x = model
            .add_variables(VariableSpec::new().lower(0.0).coords([time.clone()]).name("x"))
            .unwrap();
        let y = model
            .add_variables(VariableSpec::new().lower(0.0).coords([time]).name("y"))
            .unwrap();
        let expr = x.to_linexpr(1.0).add(&y.to_linexpr(-1.0)).unwrap();
        model.add_constraints(expr.le_scalar(0.0), None, None).unwrap();
        model
            .add_objective(y.sum(), Sense::Maximize)
            .unwrap();
        model.to_matrix_view().unwrap()
    };
    assert_eq!(build(), build());
}

/// Mixed-integer declaration surfaces in the view.
#[test]
fn test_integrality_flags_in_view() {
    let mut model = Model::new();
    model
        .add_variables(VariableSpec::new().lower(0.0).name("flow"))
        .unwrap();
    model
        .add_variables(VariableSpec::new().binary().name("on"))
        .unwrap();
    let view = model.to_matrix_view().unwrap();
    assert_eq!(view.integer, vec![false, true]);
    assert_eq!(view.lower, vec![0.0, 0.0]);
    assert_eq!(view.upper, vec![f64::INFINITY, 1.0]);
}
