//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::inference::{EconomicCondition, PredictionRequest};

use super::error::{Result, ServerError};
use super::state::AppState;

// ============================================================================
// System
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model_loaded": state.is_loaded(),
        "uptime_secs": uptime.num_seconds(),
    }))
}

// ============================================================================
// Model
// ============================================================================

/// Feature list, roles, form defaults and training metadata
pub async fn model_info(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>> {
    let predictor = state.predictor().await?;
    let artifact = predictor.artifact();

    let features: Vec<serde_json::Value> = artifact
        .feature_names
        .iter()
        .zip(&artifact.feature_roles)
        .zip(&artifact.default_values)
        .map(|((name, role), default)| {
            json!({
                "name": name,
                "role": role,
                "default": default,
            })
        })
        .collect();

    let economies: Vec<serde_json::Value> = EconomicCondition::ALL
        .iter()
        .map(|condition| {
            json!({
                "value": condition,
                "label": condition.label(),
                "multiplier": condition.multiplier(),
            })
        })
        .collect();

    Ok(Json(json!({
        "features": features,
        "defaults": predictor.default_input()?,
        "economies": economies,
        "currency_rate": predictor.config().currency_rate,
        "currency_symbol": predictor.config().currency_symbol,
        "metadata": artifact.metadata,
    })))
}

// ============================================================================
// Inference
// ============================================================================

/// Malformed bodies are answered with the JSON error shape instead of axum's plain-text rejection
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = payload.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
    let predictor = state.predictor().await?;
    let prediction = predictor.predict(&request)?;

    info!(
        economy = %prediction.economy,
        predicted_cost = prediction.predicted_cost,
        "Served prediction"
    );

    Ok(Json(json!({
        "success": true,
        "formatted_cost": prediction.formatted_cost,
        "predicted_cost": prediction.predicted_cost,
        "raw_prediction": prediction.raw_prediction,
        "currency_rate": prediction.currency_rate,
        "economy": prediction.economy,
        "multiplier": prediction.multiplier,
        "base_value": prediction.explanation.base_value,
        "contributions": prediction.top_contributions(),
    })))
}

// ============================================================================
// UI Handler
// ============================================================================

pub async fn serve_index() -> Html<&'static str> {
    Html(EMBEDDED_INDEX_HTML)
}

const EMBEDDED_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Construction Cost Estimator</title>
    <script defer src="https://cdn.jsdelivr.net/npm/alpinejs@3.x.x/dist/cdn.min.js"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>[x-cloak]{display:none!important}</style>
</head>
<body class="bg-gray-900 text-gray-100 min-h-screen" x-data="app()">
    <header class="bg-gray-800 border-b border-gray-700 px-6 py-4">
        <div class="flex items-center justify-between">
            <h1 class="text-xl font-bold">Construction Cost Estimator</h1>
            <span class="text-sm text-gray-400" x-text="meta ? 'test R² ' + meta.test_r2.toFixed(4) : ''"></span>
        </div>
    </header>
    <main class="p-6">
        <div x-show="error" x-cloak class="mb-6 bg-red-900 border border-red-700 rounded-lg p-4" x-text="error"></div>
        <div class="grid grid-cols-2 gap-6" x-show="form" x-cloak>
            <div class="bg-gray-800 rounded-lg p-6">
                <h2 class="text-lg font-semibold mb-4">Project</h2>
                <div class="grid grid-cols-2 gap-4">
                    <div><label class="block text-sm mb-1">Total floor area</label><input type="number" step="any" x-model.number="form.total_floor_area" class="w-full bg-gray-700 rounded p-2"></div>
                    <div><label class="block text-sm mb-1">Lot area</label><input type="number" step="any" x-model.number="form.lot_area" class="w-full bg-gray-700 rounded p-2"></div>
                    <div><label class="block text-sm mb-1">Preliminary unit cost</label><input type="number" step="any" x-model.number="form.prelim_est_unit_cost" class="w-full bg-gray-700 rounded p-2"></div>
                    <div><label class="block text-sm mb-1">Unit price at start</label><input type="number" step="any" x-model.number="form.unit_price_start" class="w-full bg-gray-700 rounded p-2"></div>
                    <div><label class="block text-sm mb-1">Duration (months): <span x-text="form.duration"></span></label><input type="range" min="1" max="36" step="1" x-model.number="form.duration" class="w-full"></div>
                    <div><label class="block text-sm mb-1">Project locality</label><select x-model.number="form.project_locality" class="w-full bg-gray-700 rounded p-2"><template x-for="n in 20"><option :value="n" x-text="n" :selected="n===form.project_locality"></option></template></select></div>
                    <div><label class="block text-sm mb-1">Economic condition</label><select x-model="form.economy" class="w-full bg-gray-700 rounded p-2"><template x-for="e in economies"><option :value="e.value" x-text="e.label + ' (×' + e.multiplier + ')'" :selected="e.value===form.economy"></option></template></select></div>
                    <div><label class="block text-sm mb-1">Currency rate</label><input type="number" step="any" min="0" x-model.number="form.currency_rate" class="w-full bg-gray-700 rounded p-2"></div>
                </div>
                <button @click="predict()" :disabled="busy" class="mt-6 px-6 py-2 bg-blue-600 hover:bg-blue-700 disabled:bg-gray-600 rounded">Estimate</button>
            </div>
            <div class="bg-gray-800 rounded-lg p-6" x-show="result">
                <h2 class="text-lg font-semibold mb-2">Estimated cost</h2>
                <div class="text-3xl font-bold text-green-500 mb-1" x-text="result?.formatted_cost"></div>
                <div class="text-sm text-gray-400 mb-6" x-text="'raw model output ' + result?.raw_prediction.toFixed(2)"></div>
                <h3 class="text-sm font-semibold mb-3 text-gray-300">Top feature contributions</h3>
                <div class="space-y-2">
                    <template x-for="c in result?.contributions || []">
                        <div>
                            <div class="flex justify-between text-sm"><span x-text="c.feature_name"></span><span x-text="c.contribution.toFixed(2)"></span></div>
                            <div class="w-full bg-gray-700 rounded h-2"><div class="h-2 rounded" :class="c.contribution >= 0 ? 'bg-blue-500' : 'bg-red-500'" :style="'width:' + (100 * Math.abs(c.contribution) / maxAbs()) + '%'"></div></div>
                        </div>
                    </template>
                </div>
            </div>
        </div>
    </main>
    <script>
    function app(){return{form:null,economies:[],meta:null,result:null,error:null,busy:false,
    async init(){try{const r=await fetch('/api/model');const d=await r.json();if(!r.ok){this.error=d.message;return}
        this.meta=d.metadata;this.economies=d.economies;
        this.form=Object.assign({},d.defaults,{economy:'stable',currency_rate:d.currency_rate,
            duration:Math.min(36,Math.max(1,Math.round(d.defaults.duration))),
            project_locality:Math.min(20,Math.max(1,Math.round(d.defaults.project_locality)))})}catch(e){this.error=String(e)}},
    maxAbs(){const v=(this.result?.contributions||[]).map(c=>Math.abs(c.contribution));return Math.max(1e-12,...v)},
    async predict(){this.busy=true;this.error=null;try{const r=await fetch('/api/predict',{method:'POST',headers:{'Content-Type':'application/json'},body:JSON.stringify(this.form)});const d=await r.json();if(r.ok){this.result=d}else{this.error=d.message}}catch(e){this.error=String(e)}finally{this.busy=false}}}}
    </script>
</body>
</html>"#;
