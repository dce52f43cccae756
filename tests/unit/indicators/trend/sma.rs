use crate::support::candles_from_closes;
use sigfuse::indicators::trend::{calculate_sma, calculate_sma_series};

#[test]
fn test_sma_rolls() {
    let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0], 1000.0);
    assert_eq!(calculate_sma_series(&candles, 3).unwrap(), vec![2.0, 3.0, 4.0]);

    let sma = calculate_sma(&candles, 3).unwrap();
    assert_eq!(sma.value, 4.0);
    assert_eq!(sma.previous, Some(3.0));
}

#[test]
fn test_sma_insufficient_data() {
    let candles = candles_from_closes(&[1.0, 2.0], 1000.0);
    assert!(calculate_sma(&candles, 3).is_err());
    assert!(calculate_sma(&candles, 2).is_ok());
}
