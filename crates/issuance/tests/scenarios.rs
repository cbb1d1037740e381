use forecast_issuance::*;

#[test]
fn genesis_block() {
    let calc = IssuanceCalculator::default();

    let halving = calc.halving(0).unwrap();
    assert_eq!(halving.epoch, 0);
    assert_eq!(halving.current_target, 400_000);
    assert_eq!(halving.next_target, 200_000.0);

    let period = calc.period(0).unwrap();
    assert_eq!(period.period_index, 1);
    assert_eq!(period.start_block, 0);
    assert_eq!(period.end_block, 9_999);
    assert_eq!(period.blocks_elapsed, 1);
    assert_eq!(period.blocks_remaining, 9_999);
}

#[test]
fn halving_boundary() {
    let calc = IssuanceCalculator::default();

    assert_eq!(calc.halving(2_629_999).unwrap().epoch, 0);

    let after = calc.halving(2_630_000).unwrap();
    assert_eq!(after.epoch, 1);
    assert_eq!(after.current_target, 200_000);
}

#[test]
fn on_target_forecast() {
    let params = IssuanceParams::default();
    let forecast = compute_forecast(1_000, 200_000.0, 5_000, 400_000, &params).unwrap();

    assert_eq!(forecast.forecasted_total, 400_000);
    assert_eq!(forecast.raw_forecasted_rate, 1_000);
    assert_eq!(forecast.forecasted_rate, 1_000);
    assert_eq!(forecast.change_percent, 0.0);
}

#[test]
fn under_target_forecast_doubles() {
    let params = IssuanceParams::default();
    let forecast = compute_forecast(1_000, 100_000.0, 5_000, 400_000, &params).unwrap();

    assert_eq!(forecast.forecasted_total, 200_000);
    assert_eq!(forecast.raw_forecasted_rate, 2_000);
    assert_eq!(forecast.forecasted_rate, 2_000);
    assert_eq!(forecast.change_percent, 100.0);
}

#[test]
fn nothing_minted_is_a_defined_failure() {
    let params = IssuanceParams::default();
    let err = compute_forecast(1_000, 0.0, 5_000, 400_000, &params).unwrap_err();
    assert_eq!(err, IssuanceError::ForecastUndefined);

    let calc = IssuanceCalculator::default();
    let err = calc
        .snapshot(&IssuanceInputs::new(4_999, 1_000, 0.0))
        .unwrap_err();
    assert_eq!(err, IssuanceError::ForecastUndefined);
}

#[test]
fn zero_rate_is_a_defined_failure() {
    let calc = IssuanceCalculator::default();
    let err = calc
        .snapshot(&IssuanceInputs::new(4_999, 0, 10.0))
        .unwrap_err();
    assert_eq!(err, IssuanceError::RateUnavailable);
}

#[test]
fn snapshot_serializes_for_reporting() {
    let calc = IssuanceCalculator::default();
    let snapshot = calc
        .snapshot(&IssuanceInputs::new(4_999, 1_000, 200_000.0))
        .unwrap();
    let value = serde_json::to_value(snapshot).unwrap();

    assert_eq!(value["period"]["blocks_elapsed"], 5_000);
    assert_eq!(value["forecast"]["forecasted_rate"], 1_000);
    assert_eq!(value["halving"]["current_target"], 400_000);
}
