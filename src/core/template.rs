/// 地圖頁面模板，`{{NAME}}` 形式的佔位符由 `render` 模組替換
pub const MAP_HTML: &str = r#"<!doctype html>
<html lang="en">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta name="generator" content="travel-map" />
  <meta name="generated-at" content="{{GENERATED_AT}}" />
  <title>{{TITLE}}</title>

  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous"
    referrerpolicy="no-referrer" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"
    referrerpolicy="no-referrer"></script>

  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { position: absolute; inset: 0; }

    .legend-stack {
      display: flex;
      flex-direction: column;
      gap: 8px;
      background: rgba(255, 255, 255, 0.9);
      padding: 8px 10px;
      border-radius: 4px;
      box-shadow: 0 1px 5px rgba(0, 0, 0, 0.4);
      font: 12px/1.4 "Helvetica Neue", Arial, sans-serif;
    }

    .legend-item .legend-caption { font-weight: 600; margin-bottom: 2px; }
    .legend-item .legend-bar { width: 240px; height: 10px; border: 1px solid #555; }
    .legend-item .legend-range { display: flex; justify-content: space-between; }

    .country-tooltip th { text-align: left; padding-right: 8px; }
  </style>
</head>

<body>
  <div id="map"></div>

  <script>
    var map = L.map('map', { center: [0, 0], zoom: 2 });

    L.tileLayer({{TILES_URL}}, { attribution: {{TILES_ATTRIBUTION}}, maxZoom: 18 }).addTo(map);

    var BASE_STYLE = {{BASE_STYLE}};

    function styleFeature(feature) {
      return Object.assign({ fillColor: feature.properties.fill_color }, BASE_STYLE);
    }

    function bindTooltip(feature, layer) {
      layer.bindTooltip(feature.properties.tooltip, { sticky: true });
    }

    var overlays = {};
{{LAYERS}}
    L.control.layers(null, overlays, { collapsed: false }).addTo(map);

    var legend = L.control({ position: 'bottomright' });
    legend.onAdd = function () {
      var div = L.DomUtil.create('div', 'legend-stack');
      div.innerHTML = {{LEGENDS}};
      return div;
    };
    legend.addTo(map);

    map.fitBounds({{BOUNDS}});
  </script>
</body>

</html>
"#;
