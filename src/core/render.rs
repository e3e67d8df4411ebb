//! 產生 Leaflet 分層設色地圖。
//!
//! 每項指標一個圖層，顏色、提示框與圖例都在這裡算好後嵌入頁面，
//! 瀏覽器端只負責套用。整份 HTML 先在記憶體中完成，寫檔交給 load 階段。

use crate::core::color::{fill_color, ColorScale, Rgb};
use crate::core::export::to_feature_collection;
use crate::core::template::MAP_HTML;
use crate::domain::model::{Bounds, JoinedRecord, LayerSummary, Metric, RenderedMap};
use crate::utils::error::{MapError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

pub const DEFAULT_TILES_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_TILES_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// 所有圖層共用的外框與透明度
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStyle {
    pub color: &'static str,
    pub weight: u32,
    pub fill_opacity: f64,
}

pub const BASE_STYLE: BaseStyle = BaseStyle {
    color: "black",
    weight: 2,
    fill_opacity: 0.6,
};

#[derive(Debug, Clone)]
pub struct Captions {
    pub flight_price: String,
    pub cost_of_living: String,
    pub budget: String,
}

impl Captions {
    pub fn new(flight_caption: String, currency: &str, trip_length_days: u32) -> Self {
        Self {
            flight_price: flight_caption,
            cost_of_living: format!("Cost of living index ({})", currency),
            budget: format!("Budget for {} days ({})", trip_length_days, currency),
        }
    }

    pub fn for_metric(&self, metric: Metric) -> &str {
        match metric {
            Metric::FlightPrice => &self.flight_price,
            Metric::CostOfLiving => &self.cost_of_living,
            Metric::Budget => &self.budget,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub tiles_url: String,
    pub tiles_attribution: String,
    pub captions: Captions,
    pub generated_at: DateTime<Utc>,
}

pub fn render_map(joined: &[JoinedRecord], options: &RenderOptions) -> Result<RenderedMap> {
    if joined.is_empty() {
        return Err(MapError::NothingToRenderError);
    }

    let bounds = compute_bounds(joined).ok_or_else(|| MapError::RenderError {
        message: "joined geometries contain no coordinates".to_string(),
    })?;

    let mut layers_js = String::new();
    let mut legends_html = String::new();
    let mut summaries = Vec::with_capacity(Metric::ALL.len());

    for (index, metric) in Metric::ALL.into_iter().enumerate() {
        let scale = ColorScale::from_values(joined.iter().map(|r| metric.value(&r.metrics)))
            .ok_or_else(|| MapError::RenderError {
                message: format!("no finite values for {}", metric.key()),
            })?;

        if scale.is_degenerate() {
            tracing::debug!(
                "{} has a single value ({}), using a uniform color",
                metric.key(),
                scale.min
            );
        }

        layers_js.push_str(&layer_script(joined, metric, &scale, index == 0)?);
        legends_html.push_str(&legend_html(options.captions.for_metric(metric), &scale));
        summaries.push(LayerSummary {
            metric: metric.key(),
            min: scale.min,
            max: scale.max,
            features: joined.len(),
        });
    }

    let bounds_json = script_json(&[[bounds.south, bounds.west], [bounds.north, bounds.east]])?;
    let html = fill_template(
        MAP_HTML,
        &[
            ("GENERATED_AT", escape_html(&options.generated_at.to_rfc3339())),
            ("TITLE", escape_html(&options.title)),
            ("TILES_URL", script_json(&options.tiles_url)?),
            ("TILES_ATTRIBUTION", script_json(&options.tiles_attribution)?),
            ("BASE_STYLE", script_json(&BASE_STYLE)?),
            ("LEGENDS", script_json(&legends_html)?),
            ("BOUNDS", bounds_json),
            ("LAYERS", layers_js),
        ],
    )?;

    Ok(RenderedMap {
        html,
        layers: summaries,
        bounds,
    })
}

/// 一次掃過模板替換 `{{NAME}}`，替換進去的內容不會再被掃描
fn fill_template(template: &str, values: &[(&str, String)]) -> Result<String> {
    let re = Regex::new(r"\{\{([A-Z_]+)\}\}").map_err(|e| MapError::RenderError {
        message: format!("template pattern: {}", e),
    })?;

    let mut unknown = Vec::new();
    let html = re.replace_all(template, |caps: &regex::Captures| {
        match values.iter().find(|(name, _)| *name == &caps[1]) {
            Some((_, value)) => value.clone(),
            None => {
                unknown.push(caps[1].to_string());
                caps[0].to_string()
            }
        }
    });

    if !unknown.is_empty() {
        return Err(MapError::RenderError {
            message: format!("template placeholders without value: {}", unknown.join(", ")),
        });
    }
    Ok(html.into_owned())
}

/// 單一指標圖層的 JS：嵌入 GeoJSON，並把圖層登記到 overlays
fn layer_script(
    joined: &[JoinedRecord],
    metric: Metric,
    scale: &ColorScale,
    visible: bool,
) -> Result<String> {
    let collection = to_feature_collection(joined, |record, properties| {
        let color = fill_color(metric.value(&record.metrics), scale);
        properties.insert("fill_color".to_string(), color.to_hex().into());
        properties.insert("tooltip".to_string(), tooltip_html(record).into());
    });

    let variable = format!("layer_{}", metric.key());
    let mut script = format!(
        "    var {variable} = L.geoJSON({data}, {{ style: styleFeature, onEachFeature: bindTooltip }});\n    overlays[{label}] = {variable};\n",
        variable = variable,
        data = script_json(&collection)?,
        label = script_json(metric.label())?,
    );
    if visible {
        script.push_str(&format!("    {}.addTo(map);\n", variable));
    }
    Ok(script)
}

/// 每個圖層都顯示全部三項指標
fn tooltip_html(record: &JoinedRecord) -> String {
    let mut html = String::from("<table class=\"country-tooltip\">");
    html.push_str(&format!(
        "<tr><th>Country</th><td>{}</td></tr>",
        escape_html(record.name())
    ));
    for metric in Metric::ALL {
        html.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>",
            metric.label(),
            metric.display(&record.metrics)
        ));
    }
    html.push_str("</table>");
    html
}

fn legend_html(caption: &str, scale: &ColorScale) -> String {
    let background = if scale.is_degenerate() {
        scale.fallback().to_hex()
    } else {
        let stops: Vec<String> = scale.stops().iter().map(Rgb::to_hex).collect();
        format!("linear-gradient(to right, {})", stops.join(", "))
    };

    format!(
        "<div class=\"legend-item\"><div class=\"legend-caption\">{caption}</div>\
         <div class=\"legend-bar\" style=\"background: {background}\"></div>\
         <div class=\"legend-range\"><span>{min}</span><span>{max}</span></div></div>",
        caption = escape_html(caption),
        background = background,
        min = scale.min,
        max = scale.max,
    )
}

/// 所有幾何座標的外框；沒有任何座標時回傳 None
pub fn compute_bounds(joined: &[JoinedRecord]) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;

    let mut extend = |position: &[f64]| {
        if let [lon, lat, ..] = position {
            let b = bounds.get_or_insert(Bounds {
                south: *lat,
                west: *lon,
                north: *lat,
                east: *lon,
            });
            b.south = b.south.min(*lat);
            b.north = b.north.max(*lat);
            b.west = b.west.min(*lon);
            b.east = b.east.max(*lon);
        }
    };

    for record in joined {
        match &record.geometry.value {
            geojson::Value::Polygon(rings) => rings.iter().flatten().for_each(|p| extend(p.as_slice())),
            geojson::Value::MultiPolygon(polygons) => polygons
                .iter()
                .flatten()
                .flatten()
                .for_each(|p| extend(p.as_slice())),
            _ => {}
        }
    }

    bounds
}

/// 序列化成可直接放進 <script> 的 JSON
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
