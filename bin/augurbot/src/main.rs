use chrono::Utc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use advisor::{GeminiClient, MarketSnapshot, NewsApiClient, SuggestionContext};
use common::{AdvisoryModel, EnvConfig, MarketDataSource, Settings, Signal};
use exchange::BinanceClient;
use strategy::{risk_levels, StrategyKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let env = EnvConfig::from_env();
    let config_path =
        std::env::var("AUGUR_CONFIG").unwrap_or_else(|_| "augur.toml".to_string());
    let settings = Settings::load(&config_path)?;
    let kind = StrategyKind::from_name(&settings.default_strategy)?;
    info!(
        strategy = kind.name(),
        pairs = settings.trading_pairs.len(),
        timeframe = %settings.default_timeframe,
        interval_secs = settings.scan_interval_secs,
        "AugurBot starting"
    );

    // ── Collaborators ─────────────────────────────────────────────────────────
    let market = BinanceClient::new(env.binance_api_key.clone(), env.binance_secret.clone());
    let model = env
        .gemini_api_key
        .as_deref()
        .map(|key| GeminiClient::new(key, &settings.gemini_model));
    let news = env.news_api_token.as_deref().map(NewsApiClient::new);
    if model.is_none() {
        info!("GEMINI_API_KEY not set, AI suggestions disabled");
    }

    // Account overview once at startup; credentials are optional, candle
    // data is public.
    if env.binance_api_key.is_some() {
        match market.account_overview().await {
            Ok(a) => info!(
                total = a.total_balance,
                available = a.available_balance,
                unrealized_pnl = a.unrealized_pnl,
                "futures account"
            ),
            Err(e) => warn!(error = %e, "account overview unavailable"),
        }
    }

    // ── Scan loop ─────────────────────────────────────────────────────────────
    let mut ticker =
        tokio::time::interval(std::time::Duration::from_secs(settings.scan_interval_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                scan_cycle(&market, model.as_ref(), &kind, &settings).await;
                if settings.news_enabled {
                    match (&news, &model) {
                        (Some(news), Some(model)) => news_cycle(news, model, &settings).await,
                        _ => warn!("news_enabled is set but NEWS_API_TOKEN or GEMINI_API_KEY is missing"),
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received. Exiting.");
                break;
            }
        }
    }
    Ok(())
}

/// One pass over every configured pair. A failure on one pair is logged
/// and must not stop the rest.
async fn scan_cycle(
    market: &BinanceClient,
    model: Option<&GeminiClient>,
    kind: &StrategyKind,
    settings: &Settings,
) {
    for pair in &settings.trading_pairs {
        if let Err(e) = scan_pair(market, model, kind, settings, pair).await {
            error!(pair = %pair, error = %e, "scan failed");
        }
    }
}

async fn scan_pair(
    market: &BinanceClient,
    model: Option<&GeminiClient>,
    kind: &StrategyKind,
    settings: &Settings,
    pair: &str,
) -> common::Result<()> {
    let series = market
        .candles(
            pair,
            &settings.default_timeframe,
            settings.candle_limit,
            None,
            None,
        )
        .await?;
    let bundle = indicators::compute(&series, &settings.indicators)?;
    let verdict = kind.evaluate(&series, &bundle)?;
    let price = series.last().close;

    if verdict.signal == Signal::None {
        info!(pair = %pair, price, "no setup");
    } else {
        match bundle.latest("atr") {
            Some(atr) => {
                let levels = risk_levels(price, atr, settings.risk_reward_ratio);
                let stop_pct = (price - levels.stop_loss) / price * 100.0;
                if stop_pct > settings.max_stop_loss_pct {
                    warn!(
                        pair = %pair,
                        stop_pct,
                        cap = settings.max_stop_loss_pct,
                        "stop distance exceeds the configured cap"
                    );
                }
                info!(
                    pair = %pair,
                    signal = %verdict.signal,
                    entry = price,
                    stop_loss = levels.stop_loss,
                    take_profit = levels.take_profit,
                    "strategy signal"
                );
            }
            None => info!(
                pair = %pair,
                signal = %verdict.signal,
                entry = price,
                "strategy signal, ATR window not filled, no risk levels"
            ),
        }
    }

    if let Some(model) = model {
        let ctx = SuggestionContext {
            symbol: pair.to_string(),
            timeframe: settings.default_timeframe.clone(),
            strategy_name: kind.name().to_string(),
            current_price: price,
        };
        let prompt = advisor::suggestion_prompt(&ctx, &MarketSnapshot::from_bundle(&series, &bundle))?;
        let raw = model.generate(&prompt).await?;
        match advisor::parse_suggestion(&raw, &ctx) {
            Ok(s) if s.confidence_score >= settings.ai_confidence_threshold => info!(
                pair = %pair,
                signal = %s.signal,
                confidence = s.confidence_score,
                entry = s.entry_price,
                stop_loss = s.stop_loss,
                rationale = %s.rationale,
                "AI suggestion accepted"
            ),
            Ok(s) => info!(
                pair = %pair,
                confidence = s.confidence_score,
                threshold = settings.ai_confidence_threshold,
                "AI suggestion below confidence threshold, discarded"
            ),
            Err(e) => warn!(pair = %pair, error = %e, "AI suggestion rejected"),
        }
    }
    Ok(())
}

/// The news pass: discover headlines, digest sentiment for the primary
/// pair, then the strict per-article verdicts across all pairs.
async fn news_cycle(news: &NewsApiClient, model: &GeminiClient, settings: &Settings) {
    let focus = settings.trading_pairs.join(", ");
    let date = Utc::now().format("%Y-%m-%d").to_string();

    match model.generate(&advisor::discovery_prompt(&focus, &date)).await {
        Ok(text) => {
            let headlines = advisor::parse_headlines(&text);
            for headline in &headlines {
                info!(headline = %headline, "discovered");
            }
            if let Some(primary) = settings.trading_pairs.first() {
                match model.generate(&advisor::digest_prompt(&text, primary)).await {
                    Ok(analysis) => {
                        let digest = advisor::parse_digest(&analysis);
                        info!(
                            pair = %primary,
                            sentiment = digest.sentiment.as_deref().unwrap_or("-"),
                            signal = digest.signal.as_deref().unwrap_or("-"),
                            confidence = digest.confidence.as_deref().unwrap_or("-"),
                            "market digest"
                        );
                        if let Some(raw) = &digest.raw {
                            warn!(raw = %raw, "digest did not match any marker");
                        }
                    }
                    Err(e) => warn!(error = %e, "digest request failed"),
                }
            }
        }
        Err(e) => warn!(error = %e, "news discovery failed"),
    }

    match advisor::news_signals(news, model, &settings.trading_pairs).await {
        Ok(signals) => {
            for s in &signals {
                info!(
                    pair = %s.trading_pair,
                    signal = %s.signal,
                    confidence = s.confidence_score,
                    title = s.news_title.as_deref().unwrap_or("-"),
                    rationale = %s.rationale,
                    "news signal"
                );
            }
        }
        Err(e) => warn!(error = %e, "news signal pass failed"),
    }
}
