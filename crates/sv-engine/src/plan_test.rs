use super::*;
use sv_core::{DatasetName, Format};

fn scan() -> LazyFrame {
    LazyFrame::scan(DatasetDescriptor::new(
        DatasetName::try_new("order").unwrap(),
        "/data/raw/order/order.json",
        Format::Json,
    ))
}

#[test]
fn test_combinators_nest_plans() {
    let frame = scan().sample(0.01, 42).limit(100);
    match frame.plan() {
        LogicalPlan::Limit { input, n } => {
            assert_eq!(*n, 100);
            assert!(matches!(
                input.as_ref(),
                LogicalPlan::Sample { fraction, seed: 42, .. } if *fraction == 0.01
            ));
        }
        other => panic!("unexpected root {:?}", other),
    }
    assert_eq!(frame.plan().dataset().name, "order");
}

#[test]
fn test_explain_renders_tree() {
    let text = scan().sample(0.5, 7).limit(10).explain();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Limit: 10");
    assert_eq!(lines[1], "  Sample: fraction=0.5 seed=7");
    assert!(lines[2].starts_with("    Scan: order [json]"));
}

#[test]
fn test_validate_rejects_bad_fraction() {
    for fraction in [0.0, -0.5, 1.5, f64::NAN] {
        let err = scan().sample(fraction, 1).plan().validate().unwrap_err();
        assert!(err.to_string().contains("[S003]"), "{}", err);
    }
    assert!(scan().sample(1.0, 1).limit(0).plan().validate().is_ok());
}
