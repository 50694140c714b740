//! Portfolio engine.

use std::collections::HashMap;

use chrono::NaiveDate;
use cot_core::error::{ConfigError, EngineError, SizingError};
use cot_core::traits::{BrokerEvent, ContractLookup, ContractSpec};
use cot_core::types::{
    InstrumentBar, OrderIntent, Position, PositionState, PositioningRecord, Side,
};
use cot_risk::{to_decimal, RiskBudgetSizer, Sizer, SizingRequest};
use cot_signals::{BreakoutReading, BreakoutSignal};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::book::{InstrumentBook, InstrumentSnapshot};
use crate::settings::{EngineSettings, EntryPrecedence};

/// Per-bar inputs shared by every instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarContext {
    pub date: NaiveDate,
    /// Position of the bar in the merged timeline, from 0
    pub bar_index: usize,
    /// AUM snapshotted once for the bar, after the previous bar's
    /// notifications were applied
    pub aum: Decimal,
}

/// Decision engine for a fixed universe of instruments.
///
/// Instruments are processed in universe order. The engine's own book is the
/// record of positions: entries are assumed filled when emitted, and a
/// position only returns to Flat through [`PortfolioEngine::on_stop_filled`].
pub struct PortfolioEngine {
    settings: EngineSettings,
    books: Vec<InstrumentBook>,
    index: HashMap<String, usize>,
    sizer: Box<dyn Sizer>,
}

impl PortfolioEngine {
    /// Build an engine, resolving every symbol against the contract lookup.
    ///
    /// Fails before any bar is processed on invalid settings or an
    /// unregistered symbol.
    pub fn new(settings: EngineSettings, contracts: &impl ContractLookup) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut books = Vec::with_capacity(settings.universe.len());
        let mut index = HashMap::with_capacity(settings.universe.len());
        for symbol in &settings.universe {
            let spec = contracts.lookup(symbol)?;
            index.insert(symbol.clone(), books.len());
            books.push(InstrumentBook::new(
                symbol.clone(),
                spec,
                BreakoutSignal::new(settings.channel_period, settings.breakout_mode),
                settings
                    .signal_kind
                    .build(settings.positioning_lookback, settings.thresholds),
            ));
        }

        let sizer = Box::new(RiskBudgetSizer::new(
            settings.risk_fraction,
            settings.n_entries,
            settings.concentration_cap,
        ));

        info!(
            "Engine ready: {} instruments, {} signal, channel {} / lookback {}",
            books.len(),
            settings.signal_kind,
            settings.channel_period,
            settings.positioning_lookback
        );

        Ok(Self {
            settings,
            books,
            index,
            sizer,
        })
    }

    /// Replace the sizing policy.
    pub fn with_sizer(mut self, sizer: Box<dyn Sizer>) -> Self {
        info!("Sizing with {}", sizer.name());
        self.sizer = sizer;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Symbols in processing order.
    pub fn universe(&self) -> impl Iterator<Item = &str> {
        self.books.iter().map(|b| b.symbol.as_str())
    }

    /// Decide the intents for one instrument on one bar.
    ///
    /// Returns no intents while the instrument is Inactive. For an open
    /// position, any market intent comes first and is followed by the
    /// reissued protective stop covering the whole position.
    pub fn on_bar(
        &mut self,
        symbol: &str,
        bar: &InstrumentBar,
        record: Option<&PositioningRecord>,
        ctx: &BarContext,
    ) -> Result<Vec<OrderIntent>, EngineError> {
        let idx = self.book_index(symbol)?;
        let settings = &self.settings;
        let sizer = self.sizer.as_ref();
        let book = &mut self.books[idx];

        let Some((reading, positioning)) = book.advance(bar, record) else {
            debug!("{} inactive on {}", symbol, ctx.date);
            return Ok(Vec::new());
        };

        let stop_price = match to_decimal(reading.stop_price()) {
            Ok(price) => price,
            Err(e) => {
                warn!("{} skipped on {}: {}", symbol, ctx.date, e);
                return Ok(Vec::new());
            }
        };

        debug!(
            "{} {}: breakout {:.3}/{:.3} positioning {} mid {}",
            symbol, ctx.date, reading.long_score, reading.short_score, positioning, stop_price
        );

        match book.position.state {
            PositionState::Flat => Ok(enter(
                book,
                sizer,
                settings.entry_precedence,
                &reading,
                positioning,
                stop_price,
                ctx,
            )),
            PositionState::Long | PositionState::Short => {
                manage(book, sizer, settings.n_entries, &reading, stop_price, ctx)
            }
        }
    }

    /// The broker executed the instrument's protective stop.
    pub fn on_stop_filled(&mut self, symbol: &str) -> Result<(), EngineError> {
        let idx = self.book_index(symbol)?;
        let book = &mut self.books[idx];
        if book.live_stop.is_none() {
            return Err(EngineError::UnexpectedStopFill {
                symbol: symbol.to_string(),
            });
        }
        info!(
            "{} stopped out of {} x{}",
            symbol, book.position.state, book.position.size
        );
        book.close_position();
        Ok(())
    }

    /// Route a broker notification to its state transition.
    pub fn apply_event(&mut self, event: &BrokerEvent) -> Result<(), EngineError> {
        match event {
            BrokerEvent::StopFilled { instrument } => self.on_stop_filled(instrument),
        }
    }

    pub fn position(&self, symbol: &str) -> Option<Position> {
        self.index.get(symbol).map(|&i| self.books[i].position)
    }

    pub fn snapshot(&self, symbol: &str) -> Option<InstrumentSnapshot> {
        self.index.get(symbol).map(|&i| self.books[i].snapshot())
    }

    /// Snapshots of every instrument, in universe order.
    pub fn snapshots(&self) -> Vec<InstrumentSnapshot> {
        self.books.iter().map(InstrumentBook::snapshot).collect()
    }

    fn book_index(&self, symbol: &str) -> Result<usize, EngineError> {
        self.index
            .get(symbol)
            .copied()
            .ok_or_else(|| EngineError::UnknownInstrument(symbol.to_string()))
    }
}

/// Flat: at most one entry, with its first protective stop.
fn enter(
    book: &mut InstrumentBook,
    sizer: &dyn Sizer,
    precedence: EntryPrecedence,
    reading: &BreakoutReading,
    positioning: f64,
    stop_price: Decimal,
    ctx: &BarContext,
) -> Vec<OrderIntent> {
    let mut long = reading.is_long_breakout();
    let mut short = reading.is_short_breakout();
    if long && short {
        debug!("{} double breakout on {}, {}", book.symbol, ctx.date, precedence);
        match precedence {
            EntryPrecedence::LongFirst => short = false,
            EntryPrecedence::ShortFirst => long = false,
            EntryPrecedence::Skip => {
                long = false;
                short = false;
            }
        }
    }

    let (side, price) = if long && positioning > 0.0 {
        (Side::Buy, reading.long_entry_price)
    } else if short && positioning < 0.0 {
        (Side::Sell, reading.short_entry_price)
    } else {
        return Vec::new();
    };

    match size_entry(sizer, &book.spec, price, stop_price, ctx.aum) {
        Ok((price, size)) => {
            book.position.open(side, size);
            book.live_stop = Some(stop_price);
            book.entries += 1;
            info!(
                "{} {} entry on {}: {} x{} @ {}, stop {}",
                book.symbol, book.position.state, ctx.date, side, size, price, stop_price
            );
            vec![
                OrderIntent::market(&book.symbol, side, price, size),
                OrderIntent::stop(&book.symbol, side.opposite(), stop_price, size),
            ]
        }
        Err(e) => {
            book.skipped_sizings += 1;
            warn!("{} entry skipped on {}: {}", book.symbol, ctx.date, e);
            Vec::new()
        }
    }
}

/// Long or Short: optional scale-in, then the reissued stop.
fn manage(
    book: &mut InstrumentBook,
    sizer: &dyn Sizer,
    n_entries: u32,
    reading: &BreakoutReading,
    stop_price: Decimal,
    ctx: &BarContext,
) -> Result<Vec<OrderIntent>, EngineError> {
    if book.live_stop.is_none() {
        return Err(EngineError::NoLiveStop {
            symbol: book.symbol.clone(),
        });
    }

    let (side, breakout_holds, price) = match book.position.state {
        PositionState::Long => (Side::Buy, reading.is_long_breakout(), reading.long_entry_price),
        _ => (Side::Sell, reading.is_short_breakout(), reading.short_entry_price),
    };

    let mut intents = Vec::with_capacity(2);
    if breakout_holds && book.position.entry_count < n_entries {
        match size_entry(sizer, &book.spec, price, stop_price, ctx.aum) {
            Ok((price, size)) => {
                book.position.add(size);
                book.scale_ins += 1;
                info!(
                    "{} scale-in {}/{} on {}: {} x{} @ {}",
                    book.symbol,
                    book.position.entry_count,
                    n_entries,
                    ctx.date,
                    side,
                    size,
                    price
                );
                intents.push(OrderIntent::market(&book.symbol, side, price, size));
            }
            Err(e) => {
                book.skipped_sizings += 1;
                warn!("{} scale-in skipped on {}: {}", book.symbol, ctx.date, e);
            }
        }
    }

    book.live_stop = Some(stop_price);
    intents.push(OrderIntent::replacing_stop(
        &book.symbol,
        side.opposite(),
        stop_price,
        book.position.size,
    ));
    Ok(intents)
}

fn size_entry(
    sizer: &dyn Sizer,
    spec: &ContractSpec,
    price: f64,
    stop: Decimal,
    aum: Decimal,
) -> Result<(Decimal, u64), SizingError> {
    let price = to_decimal(price)?;
    let size = sizer.size(&SizingRequest {
        multiplier: spec.multiplier,
        price,
        stop,
        aum,
    })?;
    Ok((price, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::InstrumentStatus;
    use chrono::Days;
    use cot_core::types::OrderKind;
    use cot_risk::ContractSchedule;
    use cot_signals::{BreakoutMode, PositioningSignalKind};
    use rust_decimal_macros::dec;

    fn date(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Days::new(i as u64)
    }

    fn ctx(i: usize) -> BarContext {
        BarContext {
            date: date(i),
            bar_index: i,
            aum: dec!(1500000),
        }
    }

    fn settings(universe: &[&str]) -> EngineSettings {
        EngineSettings::new(
            universe.iter().map(|s| s.to_string()).collect(),
            PositioningSignalKind::NetOpenInterest,
        )
        .with_channel_period(3)
        .with_positioning_lookback(3)
    }

    fn engine(settings: EngineSettings) -> PortfolioEngine {
        PortfolioEngine::new(settings, &ContractSchedule::futures_defaults()).unwrap()
    }

    fn bar(i: usize, high: f64, low: f64) -> InstrumentBar {
        InstrumentBar::new(date(i), (high + low) / 2.0, high, low, (high + low) / 2.0)
    }

    /// Rising net open interest keeps the net signal at +1 once warm.
    fn bullish(i: usize) -> PositioningRecord {
        let mut r = PositioningRecord::empty(date(i));
        r.net_open_interest = i as f64;
        r
    }

    fn bearish(i: usize) -> PositioningRecord {
        let mut r = PositioningRecord::empty(date(i));
        r.net_open_interest = -(i as f64);
        r
    }

    /// Steady uptrend: every bar from the fourth is a long breakout with
    /// channel width 25.
    fn rising(i: usize) -> InstrumentBar {
        let high = 100.0 + 10.0 * i as f64;
        bar(i, high, high - 5.0)
    }

    fn falling(i: usize) -> InstrumentBar {
        let high = 1000.0 - 10.0 * i as f64;
        bar(i, high, high - 5.0)
    }

    fn markets(intents: &[OrderIntent]) -> usize {
        intents.iter().filter(|i| i.is_market()).count()
    }

    #[test]
    fn test_long_entry_then_scale_in() {
        let mut engine = engine(settings(&["C"]));

        for i in 0..3 {
            let intents = engine.on_bar("C", &rising(i), Some(&bullish(i)), &ctx(i)).unwrap();
            assert!(intents.is_empty());
        }

        // Channel 95..120, mid 107.5. Risk 2500 / (50 * 12.5) = 4 contracts.
        let intents = engine.on_bar("C", &rising(3), Some(&bullish(3)), &ctx(3)).unwrap();
        assert_eq!(
            intents,
            vec![
                OrderIntent::market("C", Side::Buy, dec!(120), 4),
                OrderIntent::stop("C", Side::Sell, dec!(107.5), 4),
            ]
        );
        let position = engine.position("C").unwrap();
        assert_eq!(position.state, PositionState::Long);
        assert_eq!(position.entry_count, 1);

        // Next bar: one more buy, then the stop reissued at the new mid for 8.
        let intents = engine.on_bar("C", &rising(4), Some(&bullish(4)), &ctx(4)).unwrap();
        assert_eq!(
            intents,
            vec![
                OrderIntent::market("C", Side::Buy, dec!(130), 4),
                OrderIntent::replacing_stop("C", Side::Sell, dec!(117.5), 8),
            ]
        );
        let snapshot = engine.snapshot("C").unwrap();
        assert_eq!(snapshot.entry_count, 2);
        assert_eq!(snapshot.size, 8);
        assert_eq!(snapshot.live_stop, Some(dec!(117.5)));
        assert_eq!(snapshot.status, InstrumentStatus::Long);
    }

    #[test]
    fn test_scaling_saturates_at_n_entries() {
        let mut engine = engine(settings(&["C"]));

        let mut buys = 0;
        for i in 0..12 {
            let intents = engine.on_bar("C", &rising(i), Some(&bullish(i)), &ctx(i)).unwrap();
            buys += markets(&intents);
            if i >= 6 {
                assert_eq!(markets(&intents), 0, "bar {}", i);
                assert_eq!(intents.len(), 1);
                assert!(intents[0].is_stop() && intents[0].replaces_prior_stop);
                assert_eq!(intents[0].size, 12);
            }
        }
        assert_eq!(buys, 3);
        assert_eq!(engine.position("C").unwrap().entry_count, 3);
    }

    #[test]
    fn test_short_entry_mirrors_long() {
        let mut engine = engine(settings(&["C"]));

        for i in 0..3 {
            engine.on_bar("C", &falling(i), Some(&bearish(i)), &ctx(i)).unwrap();
        }
        // Channel 975..1000 at bar 3, mid 987.5, entry at the low band.
        let intents = engine.on_bar("C", &falling(3), Some(&bearish(3)), &ctx(3)).unwrap();
        assert_eq!(
            intents,
            vec![
                OrderIntent::market("C", Side::Sell, dec!(975), 4),
                OrderIntent::stop("C", Side::Buy, dec!(987.5), 4),
            ]
        );
        assert_eq!(engine.position("C").unwrap().signed_size(), -4);

        let intents = engine.on_bar("C", &falling(4), Some(&bearish(4)), &ctx(4)).unwrap();
        assert_eq!(intents[0].side, Side::Sell);
        assert_eq!(intents[1].side, Side::Buy);
        assert_eq!(intents[1].size, 8);
    }

    #[test]
    fn test_positioning_must_agree() {
        let mut engine = engine(settings(&["C"]));
        for i in 0..8 {
            let intents = engine.on_bar("C", &rising(i), Some(&bearish(i)), &ctx(i)).unwrap();
            assert!(intents.is_empty());
        }
        assert!(engine.position("C").unwrap().is_flat());
    }

    #[test]
    fn test_flat_prices_never_trade() {
        let mut engine = engine(settings(&["C"]));
        for i in 0..60 {
            let intents = engine
                .on_bar("C", &bar(i, 100.0, 100.0), Some(&bullish(i)), &ctx(i))
                .unwrap();
            assert!(intents.is_empty());
        }
        let snapshot = engine.snapshot("C").unwrap();
        assert_eq!(snapshot.status, InstrumentStatus::Inactive);
        assert_eq!(snapshot.inactive_bars, 60);
    }

    #[test]
    fn test_missing_positioning_is_inactive() {
        let mut engine = engine(settings(&["C"]));
        for i in 0..3 {
            engine.on_bar("C", &rising(i), Some(&bullish(i)), &ctx(i)).unwrap();
        }
        let intents = engine.on_bar("C", &rising(3), None, &ctx(3)).unwrap();
        assert!(intents.is_empty());
        assert_eq!(engine.snapshot("C").unwrap().status, InstrumentStatus::Inactive);
    }

    /// Three warm-up bars over 90..110, then a bar piercing both bands.
    fn double_breakout(precedence: EntryPrecedence, bullish_positioning: bool) -> Vec<OrderIntent> {
        let mut engine = engine(settings(&["W"]).with_entry_precedence(precedence));
        let record = |i| if bullish_positioning { bullish(i) } else { bearish(i) };
        for i in 0..3 {
            engine.on_bar("W", &bar(i, 110.0, 90.0), Some(&record(i)), &ctx(i)).unwrap();
        }
        engine
            .on_bar("W", &bar(3, 115.0, 85.0), Some(&record(3)), &ctx(3))
            .unwrap()
    }

    #[test]
    fn test_precedence_long_first() {
        let intents = double_breakout(EntryPrecedence::LongFirst, true);
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].side, Side::Buy);
        assert_eq!(intents[0].price, dec!(110));

        assert!(double_breakout(EntryPrecedence::LongFirst, false).is_empty());
    }

    #[test]
    fn test_precedence_short_first() {
        let intents = double_breakout(EntryPrecedence::ShortFirst, false);
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].side, Side::Sell);
        assert_eq!(intents[0].price, dec!(90));

        assert!(double_breakout(EntryPrecedence::ShortFirst, true).is_empty());
    }

    #[test]
    fn test_precedence_skip() {
        assert!(double_breakout(EntryPrecedence::Skip, true).is_empty());
        assert!(double_breakout(EntryPrecedence::Skip, false).is_empty());
    }

    #[test]
    fn test_stop_fill_returns_to_flat_and_reenters() {
        let mut engine = engine(settings(&["C"]));
        for i in 0..4 {
            engine.on_bar("C", &rising(i), Some(&bullish(i)), &ctx(i)).unwrap();
        }
        assert_eq!(engine.position("C").unwrap().entry_count, 1);

        engine
            .apply_event(&BrokerEvent::StopFilled {
                instrument: "C".to_string(),
            })
            .unwrap();
        let snapshot = engine.snapshot("C").unwrap();
        assert_eq!(snapshot.position, PositionState::Flat);
        assert_eq!(snapshot.size, 0);
        assert_eq!(snapshot.entry_count, 0);
        assert_eq!(snapshot.live_stop, None);
        assert_eq!(snapshot.stop_fills, 1);

        // A second fill has no stop behind it.
        assert_eq!(
            engine.on_stop_filled("C"),
            Err(EngineError::UnexpectedStopFill {
                symbol: "C".to_string()
            })
        );

        // Re-entry emits a fresh, non-replacing stop.
        let intents = engine.on_bar("C", &rising(4), Some(&bullish(4)), &ctx(4)).unwrap();
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].kind, OrderKind::Market);
        assert!(!intents[1].replaces_prior_stop);
        assert_eq!(engine.position("C").unwrap().entry_count, 1);
    }

    #[test]
    fn test_open_position_without_stop_is_fatal() {
        let mut engine = engine(settings(&["C"]));
        for i in 0..4 {
            engine.on_bar("C", &rising(i), Some(&bullish(i)), &ctx(i)).unwrap();
        }
        engine.books[0].live_stop = None;

        let err = engine
            .on_bar("C", &rising(4), Some(&bullish(4)), &ctx(4))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::NoLiveStop {
                symbol: "C".to_string()
            }
        );
    }

    struct Refusing;

    impl Sizer for Refusing {
        fn size(&self, request: &SizingRequest) -> Result<u64, SizingError> {
            Err(SizingError::ZeroRisk {
                price: request.price,
                stop: request.stop,
                multiplier: request.multiplier,
            })
        }

        fn name(&self) -> &str {
            "Refusing"
        }
    }

    #[test]
    fn test_sizing_failure_skips_entry() {
        let mut engine = engine(settings(&["C"])).with_sizer(Box::new(Refusing));
        for i in 0..6 {
            let intents = engine.on_bar("C", &rising(i), Some(&bullish(i)), &ctx(i)).unwrap();
            assert!(intents.is_empty());
        }
        assert_eq!(engine.snapshot("C").unwrap().skipped_sizings, 3);
    }

    #[test]
    fn test_sizing_failure_on_scale_in_still_reissues_stop() {
        let mut engine = engine(settings(&["C"]));
        for i in 0..4 {
            engine.on_bar("C", &rising(i), Some(&bullish(i)), &ctx(i)).unwrap();
        }
        let mut engine = engine.with_sizer(Box::new(Refusing));

        let intents = engine.on_bar("C", &rising(4), Some(&bullish(4)), &ctx(4)).unwrap();
        assert_eq!(
            intents,
            vec![OrderIntent::replacing_stop("C", Side::Sell, dec!(117.5), 4)]
        );
        assert_eq!(engine.position("C").unwrap().entry_count, 1);
    }

    #[test]
    fn test_close_mode_enters_at_close() {
        let mut engine = engine(settings(&["C"]).with_breakout_mode(BreakoutMode::Close));
        for i in 0..3 {
            engine.on_bar("C", &bar(i, 110.0, 90.0), Some(&bullish(i)), &ctx(i)).unwrap();
        }
        // Close 112 over mid 100, width 20: score 1.2.
        let b = InstrumentBar::new(date(3), 100.0, 113.0, 99.0, 112.0);
        let intents = engine.on_bar("C", &b, Some(&bullish(3)), &ctx(3)).unwrap();
        assert_eq!(intents[0].price, dec!(112));
        assert_eq!(intents[1].price, dec!(100));
    }

    #[test]
    fn test_unknown_symbols() {
        let mut engine = engine(settings(&["C"]));
        assert_eq!(
            engine.on_bar("ZZ", &rising(0), None, &ctx(0)),
            Err(EngineError::UnknownInstrument("ZZ".to_string()))
        );

        let result = PortfolioEngine::new(settings(&["C", "ZZ"]), &ContractSchedule::futures_defaults());
        assert!(matches!(result, Err(ConfigError::UnregisteredSymbol(s)) if s == "ZZ"));
    }

    #[test]
    fn test_universe_order_is_preserved() {
        let engine = engine(settings(&["W", "C", "SB"]));
        assert_eq!(engine.universe().collect::<Vec<_>>(), vec!["W", "C", "SB"]);
        let symbols: Vec<String> = engine.snapshots().into_iter().map(|s| s.symbol).collect();
        assert_eq!(symbols, vec!["W", "C", "SB"]);
    }
}
