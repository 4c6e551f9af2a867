//! HTML pages of the log viewer. Values are interpolated without escaping.

use std::fmt::Write;

use crate::models::{LogEntry, SessionSummary};

pub fn login_form() -> String {
    String::from(
        r#"
    <h2>Login to View Logs</h2>
    <form method="POST" action="/view">
      <input type="text" name="username" placeholder="Username" required /><br>
      <input type="password" name="password" placeholder="Password" required /><br>
      <button type="submit">Login</button>
    </form>
  "#,
    )
}

pub fn session_list(sessions: &[SessionSummary]) -> String {
    let mut html = String::from("<h1>Available Log Sessions</h1><ul>");
    for s in sessions {
        let _ = write!(
            html,
            r#"<li><a href="/view/session/{id}">Session: {id} (User: {user})</a></li>"#,
            id = s.session_id,
            user = s.user_id
        );
    }
    html.push_str("</ul>");
    html
}

/// Chart and map page for one session. `entries` must be non-empty and in
/// timestamp order.
pub fn session_page(session_id: &str, entries: &[LogEntry]) -> String {
    let labels = join(entries, |e| format!("\"{}\"", e.timestamp.format("%H:%M:%S")));
    let elevations = join(entries, |e| e.elevation.to_string());
    let coordinates = join(entries, |e| format!("[{}, {}]", e.latitude, e.longitude));
    let (start_lat, start_lon) = entries
        .first()
        .map_or((0.0, 0.0), |e| (e.latitude, e.longitude));

    format!(
        r#"<h1>Session: {session_id}</h1>
      <button onclick="location.href='/view/session/{session_id}/export'">Download CSV</button>
      <canvas id="chart" width="600" height="300"></canvas>
      <div id="map" style="height: 400px; margin-top: 20px;"></div>
      <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.3/dist/leaflet.css" />
      <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
      <script src="https://unpkg.com/leaflet@1.9.3/dist/leaflet.js"></script>
      <script>
        const ctx = document.getElementById('chart').getContext('2d');
        new Chart(ctx, {{
          type: 'line',
          data: {{
            labels: [{labels}],
            datasets: [{{
              label: 'Elevation (m)',
              data: [{elevations}],
              borderWidth: 2,
              fill: false
            }}]
          }},
          options: {{ scales: {{ y: {{ beginAtZero: true }} }} }}
        }});

        const map = L.map('map').setView([{start_lat}, {start_lon}], 14);
        L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
          attribution: 'Map data &copy; <a href="https://openstreetmap.org">OpenStreetMap</a> contributors'
        }}).addTo(map);

        const latlngs = [{coordinates}];
        L.polyline(latlngs, {{ color: 'blue' }}).addTo(map);
        L.marker(latlngs[0]).addTo(map).bindPopup("Start").openPopup();
        L.marker(latlngs[latlngs.length - 1]).addTo(map).bindPopup("End");
      </script>"#
    )
}

fn join<F>(entries: &[LogEntry], f: F) -> String
where
    F: Fn(&LogEntry) -> String,
{
    entries.iter().map(f).collect::<Vec<_>>().join(",")
}
