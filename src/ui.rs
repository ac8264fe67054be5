pub fn render_index(month_label: &str, medication_count: usize) -> String {
    INDEX_HTML
        .replace("{{MONTH}}", month_label)
        .replace("{{COUNT}}", &medication_count.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Medication Tracker</title>
  <style>
    :root {
      --bg: #fff5f5;
      --ink: #2b2a28;
      --muted: #6b6560;
      --accent: #dc2626;
      --accent-soft: #fee2e2;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(153, 27, 27, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(180deg, var(--bg), #ffffff 70%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 28px 18px 48px;
    }

    .layout {
      width: min(1080px, 100%);
      margin: 0 auto;
      display: grid;
      grid-template-columns: minmax(260px, 1fr) 2fr;
      gap: 24px;
    }

    @media (max-width: 760px) {
      .layout {
        grid-template-columns: 1fr;
      }
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 22px;
    }

    h1 {
      width: min(1080px, 100%);
      margin: 0 auto 22px;
      color: #991b1b;
    }

    h2 {
      margin: 0 0 14px;
      font-size: 1.1rem;
    }

    form {
      display: grid;
      gap: 10px;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    input, select, button {
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid #e5d5d5;
    }

    button {
      background: var(--accent);
      color: #fff;
      border: none;
      cursor: pointer;
    }

    button.ghost {
      background: transparent;
      color: var(--accent);
    }

    .field-error {
      color: var(--accent);
      font-size: 0.8rem;
      min-height: 1em;
    }

    .med {
      padding: 12px;
      border-radius: 12px;
      cursor: pointer;
      display: grid;
      gap: 6px;
      border: 2px solid transparent;
    }

    .med[data-selected="true"] {
      border-color: var(--accent);
      background: var(--accent-soft);
    }

    .swatch {
      width: 12px;
      height: 12px;
      border-radius: 50%;
      display: inline-block;
      margin-right: 6px;
    }

    .bar {
      height: 6px;
      border-radius: 3px;
      background: var(--accent-soft);
      overflow: hidden;
    }

    .bar > span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .month-nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
      margin-bottom: 12px;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 40px);
      gap: 6px;
      justify-content: center;
    }

    .weekday {
      text-align: center;
      font-size: 0.8rem;
      color: var(--accent);
    }

    .day {
      height: 40px;
      border-radius: 50%;
      display: grid;
      place-items: center;
      cursor: pointer;
    }

    .day[data-taken="true"] {
      background: var(--accent);
      color: #fff;
    }

    .day[data-today="true"] {
      box-shadow: 0 0 0 2px var(--accent);
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 12px;
      margin-top: 18px;
    }

    .stat strong {
      display: block;
      font-size: 1.6rem;
    }

    .status {
      margin-top: 10px;
      min-height: 1.2em;
      color: var(--muted);
    }

    .reminder {
      position: fixed;
      right: 20px;
      bottom: 20px;
      width: 300px;
      display: none;
    }

    .reminder[data-visible="true"] {
      display: block;
    }
  </style>
</head>
<body>
  <h1>Medication Tracker</h1>
  <main class="layout">
    <section>
      <div class="card">
        <h2>Add medication</h2>
        <form id="add-form">
          <label>Name <input name="name" placeholder="e.g. Ibuprofen" /></label>
          <div class="field-error" data-field="name"></div>
          <label>Dosage <input name="dosage" placeholder="e.g. 200mg" /></label>
          <div class="field-error" data-field="dosage"></div>
          <label>Frequency
            <select name="frequency">
              <option>Daily</option>
              <option>Weekly</option>
              <option>As Needed</option>
            </select>
          </label>
          <div class="field-error" data-field="frequency"></div>
          <label>Time <input name="time" type="time" value="08:00" /></label>
          <div class="field-error" data-field="time"></div>
          <label><span><input name="reminders" type="checkbox" checked /> Enable reminders</span></label>
          <button type="submit">Add medication</button>
        </form>
      </div>
      <div class="card" style="margin-top: 24px">
        <h2>Your medications</h2>
        <div id="med-list"></div>
      </div>
    </section>

    <section class="card">
      <div class="month-nav">
        <button class="ghost" id="prev" type="button">&larr;</button>
        <h2 id="month-label">{{MONTH}}</h2>
        <button class="ghost" id="next" type="button">&rarr;</button>
      </div>
      <p id="tracking">Select a medication to track.</p>
      <div class="grid" id="calendar"></div>
      <div class="stats">
        <div class="stat">Current streak <strong id="streak">0 days</strong></div>
        <div class="stat">Monthly adherence <strong id="monthly">0%</strong></div>
        <div class="stat">Total medications <strong id="total">{{COUNT}}</strong></div>
      </div>
      <div class="status" id="status" role="status"></div>
    </section>
  </main>

  <aside class="card reminder" id="reminder">
    <h2>Medication reminder</h2>
    <p id="reminder-text"></p>
    <button id="reminder-confirm" type="button">Mark as taken</button>
    <button class="ghost" id="reminder-dismiss" type="button">Dismiss</button>
  </aside>

  <script>
    const form = document.getElementById('add-form');
    const listEl = document.getElementById('med-list');
    const calendarEl = document.getElementById('calendar');
    const monthEl = document.getElementById('month-label');
    const trackingEl = document.getElementById('tracking');
    const streakEl = document.getElementById('streak');
    const monthlyEl = document.getElementById('monthly');
    const totalEl = document.getElementById('total');
    const statusEl = document.getElementById('status');
    const reminderEl = document.getElementById('reminder');
    const reminderText = document.getElementById('reminder-text');
    const WEEKDAYS = ['Sun', 'Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat'];
    let selectedId = null;

    const setStatus = (message) => {
      statusEl.textContent = message || '';
    };

    const escapeHtml = (value) =>
      String(value).replace(/[&<>"']/g, (ch) => `&#${ch.charCodeAt(0)};`);

    const request = async (method, url, body) => {
      const options = { method, headers: {} };
      if (body !== undefined) {
        options.headers['Content-Type'] = 'application/json';
        options.body = JSON.stringify(body);
      }
      const resp = await fetch(url, options);
      const data = await resp.json().catch(() => ({}));
      if (!resp.ok) {
        const error = new Error(data.message || `Request failed (${resp.status})`);
        error.fields = data.errors || [];
        throw error;
      }
      return data;
    };

    const renderList = (medications) => {
      if (!medications.length) {
        listEl.innerHTML = '<p>No medications yet.</p>';
        return;
      }
      listEl.innerHTML = medications
        .map((med) => `
          <div class="med" data-id="${med.id}" data-selected="${med.id === selectedId}">
            <div><span class="swatch" style="background:${med.color}"></span><strong>${escapeHtml(med.name)}</strong> &middot; ${med.time}</div>
            <small>${escapeHtml(med.dosage)} &middot; ${med.frequency}</small>
            <small>Adherence ${med.adherence}%</small>
            <div class="bar"><span style="width:${med.adherence}%"></span></div>
          </div>`)
        .join('');
    };

    const renderCalendar = (view) => {
      monthEl.textContent = view.label;
      trackingEl.textContent = view.medication
        ? `Tracking: ${view.medication.name}`
        : 'Select a medication to track.';
      const header = WEEKDAYS.map((day) => `<div class="weekday">${day}</div>`).join('');
      const cells = view.cells
        .map((cell) => cell.kind === 'blank'
          ? '<div></div>'
          : `<div class="day" data-date="${cell.date}" data-taken="${cell.is_taken}" data-today="${cell.is_today}">${cell.day}</div>`)
        .join('');
      calendarEl.innerHTML = header + cells;
    };

    const renderStats = (stats) => {
      streakEl.textContent = `${stats.current_streak} days`;
      monthlyEl.textContent = `${stats.monthly_adherence}%`;
      totalEl.textContent = stats.total_medications;
    };

    const renderReminder = (reminder) => {
      reminderEl.dataset.visible = reminder.visible && reminder.medication ? 'true' : 'false';
      if (reminder.medication) {
        reminderText.textContent = `Time to take ${reminder.medication.name} (${reminder.medication.dosage}).`;
      }
      if (reminder.notice) {
        setStatus(reminder.notice);
      }
    };

    const refresh = async () => {
      const [list, view, stats, reminder] = await Promise.all([
        request('GET', '/api/medications'),
        request('GET', '/api/calendar'),
        request('GET', '/api/stats'),
        request('GET', '/api/reminder')
      ]);
      selectedId = view.medication ? view.medication.id : null;
      renderList(list.medications);
      renderCalendar(view);
      renderStats(stats);
      renderReminder(reminder);
    };

    const run = async (action) => {
      try {
        await action();
        await refresh();
      } catch (err) {
        setStatus(err.message);
      }
    };

    form.addEventListener('submit', (event) => {
      event.preventDefault();
      form.querySelectorAll('.field-error').forEach((el) => { el.textContent = ''; });
      const body = {
        name: form.elements.name.value,
        dosage: form.elements.dosage.value,
        frequency: form.elements.frequency.value,
        time: form.elements.time.value,
        reminders: form.elements.reminders.checked
      };
      run(async () => {
        try {
          const result = await request('POST', '/api/medications', body);
          setStatus(result.notice);
          form.reset();
        } catch (err) {
          (err.fields || []).forEach((field) => {
            const el = form.querySelector(`.field-error[data-field="${field.field}"]`);
            if (el) {
              el.textContent = field.message;
            }
          });
          throw err;
        }
      });
    });

    listEl.addEventListener('click', (event) => {
      const item = event.target.closest('.med');
      if (!item) {
        return;
      }
      run(() => request('PUT', '/api/selection', { medication_id: Number(item.dataset.id) }));
    });

    calendarEl.addEventListener('click', (event) => {
      const day = event.target.closest('.day');
      if (!day) {
        return;
      }
      run(async () => {
        const result = await request('POST', '/api/calendar/toggle', { date: day.dataset.date });
        setStatus(result.notice);
      });
    });

    document.getElementById('prev').addEventListener('click', () =>
      run(() => request('POST', '/api/calendar/navigate', { direction: 'prev' })));
    document.getElementById('next').addEventListener('click', () =>
      run(() => request('POST', '/api/calendar/navigate', { direction: 'next' })));
    document.getElementById('reminder-dismiss').addEventListener('click', () =>
      run(() => request('POST', '/api/reminder/dismiss')));
    document.getElementById('reminder-confirm').addEventListener('click', () =>
      run(async () => renderReminder(await request('POST', '/api/reminder/confirm'))));

    run(async () => {});
    setInterval(() => run(async () => {}), 30000);
  </script>
</body>
</html>
"#;
