use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use crate::classifier::Classifier;
use crate::cricket::{ChartKind, City, RatePolicy, Team};
use crate::form::MatchInput;
use crate::report::{run_prediction, PredictError, PredictionReport};

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub rate_policy: RatePolicy,
    pub default_chart: ChartKind,
}

/// Build the Axum router for the prediction form.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/options", get(options_handler))
        .route("/api/predict", post(predict_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the form page.
async fn index_handler() -> impl IntoResponse {
    Html(FORM_HTML)
}

#[derive(Debug, Serialize)]
struct FormOptions {
    teams: Vec<Team>,
    cities: Vec<City>,
    default_chart: ChartKind,
    rate_policy: RatePolicy,
    model: String,
}

/// GET /api/options
async fn options_handler(State(state): State<Arc<AppState>>) -> Json<FormOptions> {
    Json(FormOptions {
        teams: Team::sorted(),
        cities: City::sorted(),
        default_chart: state.default_chart,
        rate_policy: state.rate_policy,
        model: state.classifier.name().to_string(),
    })
}

/// POST /api/predict
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<MatchInput>,
) -> Result<Json<PredictionReport>, (StatusCode, String)> {
    let match_state = input.validate().map_err(|e| {
        warn!("Rejected form input: {}", e);
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;
    let chart = input.chart.unwrap_or(state.default_chart);

    run_prediction(state.classifier.as_ref(), &match_state, state.rate_policy, chart)
        .await
        .map(Json)
        .map_err(|e| match &e {
            PredictError::Derive(_) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            PredictError::Classifier(_) => {
                error!("Prediction failed: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        })
}

/// Embedded single-file form (HTML + CSS + JS)
const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>IPL Win Predictor</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  .badge { padding: .2rem .6rem; border-radius: 4px; font-size: .75rem; font-weight: 700; text-transform: uppercase; background: var(--border); color: var(--muted); }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; max-width: 820px; margin: 0 auto; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; }
  .panel-body { padding: 1.2rem; display: grid; gap: 1rem; }
  .row { display: grid; gap: 1rem; }
  .row.two { grid-template-columns: 1fr 1fr; }
  .row.three { grid-template-columns: 1fr 1fr 1fr; }
  @media (max-width: 640px) { .row.two, .row.three { grid-template-columns: 1fr; } }
  label { display: grid; gap: .35rem; color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; }
  select, input { background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .55rem .7rem; font-size: .95rem; }
  button { background: var(--accent); color: #fff; border: none; border-radius: 8px; padding: .75rem; font-size: 1rem; font-weight: 700; cursor: pointer; }
  button:hover { filter: brightness(1.1); }
  .odds { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  .odds-card { background: var(--bg); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; }
  .odds-card .label { color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; margin-bottom: .4rem; }
  .odds-card .value { font-size: 1.7rem; font-weight: 700; }
  .error { color: var(--red); font-size: .9rem; min-height: 1.2rem; }
  #chart-container { padding: 1rem; height: 280px; position: relative; }
  canvas { width: 100% !important; }
  .hidden { display: none; }
</style>
</head>
<body>
<header>
  <h1>🏏 IPL Win Predictor</h1>
  <span class="badge" id="model-badge">…</span>
</header>

<main>
  <div class="panel">
    <div class="panel-header">Match Situation</div>
    <form class="panel-body" id="predict-form">
      <div class="row two">
        <label>Batting Team <select id="batting_team"></select></label>
        <label>Bowling Team <select id="bowling_team"></select></label>
      </div>
      <label>Match Venue <select id="city"></select></label>
      <label>Target Score <input id="target" type="number" min="0" step="1" value="0"></label>
      <div class="row three">
        <label>Current Score <input id="score" type="number" min="0" step="1" value="0"></label>
        <label>Overs Completed <input id="overs" type="number" min="0" max="20" step="0.1" value="0"></label>
        <label>Wickets Lost <input id="wickets" type="number" min="0" max="10" step="1" value="0"></label>
      </div>
      <label>Chart
        <select id="chart">
          <option value="projection">Expected runs vs overs</option>
          <option value="run-rate">Run rate comparison</option>
        </select>
      </label>
      <button type="submit">Predict Probability</button>
      <div class="error" id="error"></div>
    </form>
  </div>

  <div class="panel hidden" id="result-panel">
    <div class="panel-header">Match Winning Probability</div>
    <div class="panel-body">
      <div class="odds">
        <div class="odds-card"><div class="label" id="bat-name">–</div><div class="value" id="bat-pct">–</div></div>
        <div class="odds-card"><div class="label" id="bowl-name">–</div><div class="value" id="bowl-pct">–</div></div>
      </div>
    </div>
    <div class="panel-header" id="chart-title">–</div>
    <div id="chart-container">
      <canvas id="chart-canvas"></canvas>
    </div>
  </div>
</main>

<script>
const $ = id => document.getElementById(id);

function fillSelect(el, values) {
  el.innerHTML = values.map(v => `<option value="${v}">${v}</option>`).join('');
}

async function loadOptions() {
  const r = await fetch('/api/options');
  if (!r.ok) return;
  const o = await r.json();
  fillSelect($('batting_team'), o.teams);
  fillSelect($('bowling_team'), o.teams);
  fillSelect($('city'), o.cities);
  $('chart').value = o.default_chart;
  $('model-badge').textContent = o.model + ' · ' + o.rate_policy;
}

async function predict(ev) {
  ev.preventDefault();
  $('error').textContent = '';
  const body = {
    batting_team: $('batting_team').value,
    bowling_team: $('bowling_team').value,
    city: $('city').value,
    target: Number($('target').value),
    score: Number($('score').value),
    overs: Number($('overs').value),
    wickets: Number($('wickets').value),
    chart: $('chart').value,
  };
  const r = await fetch('/api/predict', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  if (!r.ok) { $('error').textContent = await r.text(); return; }
  const report = await r.json();

  $('result-panel').classList.remove('hidden');
  $('bat-name').textContent = report.display.batting.team;
  $('bat-pct').textContent = report.display.batting.percent + '%';
  $('bowl-name').textContent = report.display.bowling.team;
  $('bowl-pct').textContent = report.display.bowling.percent + '%';
  $('chart-title').textContent = report.chart.title;

  if (report.chart.kind === 'projection') drawProjection(report.chart);
  else drawBars(report.chart);
}

function setupCanvas() {
  const canvas = $('chart-canvas');
  const ctx = canvas.getContext('2d');
  const W = canvas.parentElement.clientWidth - 32;
  const H = 240;
  canvas.width = W;
  canvas.height = H;
  ctx.clearRect(0, 0, W, H);
  ctx.font = '11px system-ui';
  return { ctx, W, H };
}

function drawProjection(chart) {
  const { ctx, W, H } = setupCanvas();
  const pad = 36;
  const xMax = chart.x_ticks[chart.x_ticks.length - 1] || 20;
  const yMax = chart.y_ticks.length ? chart.y_ticks[chart.y_ticks.length - 1] : 1;
  const toX = v => pad + (v / xMax) * (W - pad * 2);
  const toY = v => H - pad - (v / (yMax || 1)) * (H - pad * 2);

  // Grid lines
  ctx.strokeStyle = '#2a2d3a';
  ctx.fillStyle = '#8888aa';
  ctx.lineWidth = 1;
  chart.y_ticks.forEach(t => {
    ctx.beginPath(); ctx.moveTo(pad, toY(t)); ctx.lineTo(W - pad, toY(t)); ctx.stroke();
    ctx.fillText(t, 4, toY(t) + 4);
  });
  chart.x_ticks.forEach(t => ctx.fillText(t, toX(t) - 6, H - pad + 16));
  ctx.fillText(chart.x_label, W / 2 - 12, H - 4);

  // Stroke
  const pts = chart.series.points;
  if (!pts.length) return;
  ctx.strokeStyle = '#6c63ff';
  ctx.lineWidth = 2;
  ctx.beginPath();
  pts.forEach((p, i) => i === 0 ? ctx.moveTo(toX(p.over), toY(p.runs)) : ctx.lineTo(toX(p.over), toY(p.runs)));
  ctx.stroke();
}

function drawBars(chart) {
  const { ctx, W, H } = setupCanvas();
  const pad = 36;
  const max = Math.max(...chart.bars.map(b => Math.abs(b.runs)), 1) * 1.15;
  const slot = (W - pad * 2) / chart.bars.length;
  const colors = ['#00c896', '#ff4f6a'];
  chart.bars.forEach((b, i) => {
    const h = (Math.max(b.runs, 0) / max) * (H - pad * 2);
    const x = pad + i * slot + slot * 0.2;
    ctx.fillStyle = colors[i % colors.length];
    ctx.fillRect(x, H - pad - h, slot * 0.6, h);
    ctx.fillStyle = '#e0e0e0';
    ctx.fillText(b.runs.toFixed(2), x + slot * 0.25, H - pad - h - 6);
    ctx.fillStyle = '#8888aa';
    ctx.fillText(b.label, x, H - pad + 16);
  });
}

$('predict-form').addEventListener('submit', predict);
loadOptions();
</script>
</body>
</html>"#;
