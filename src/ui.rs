use crate::models::Field;
use crate::notify::TOAST_DURATION;

pub fn render_index(date: &str) -> String {
    let fields = Field::ALL
        .iter()
        .map(|field| format!("'{}'", field.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{FIELDS}}", &fields)
        .replace("{{TOAST_MS}}", &TOAST_DURATION.as_millis().to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Visitor Sign-In Sheet</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #23211e;
      --muted: #6d685f;
      --line: rgba(35, 33, 30, 0.16);
      --accent: #2f4858;
      --success: #2e7d4f;
      --info: #2f5d8a;
      --error: #b23a2b;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(47, 72, 88, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", Arial, sans-serif;
      padding: 28px 18px 48px;
    }

    .app {
      max-width: 1180px;
      margin: 0 auto;
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: flex-end;
      justify-content: space-between;
      gap: 16px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .controls {
      display: flex;
      gap: 10px;
      align-items: center;
    }

    input[type="date"],
    button {
      font: inherit;
      border-radius: 10px;
      border: 1px solid var(--line);
      padding: 8px 12px;
      background: white;
    }

    button {
      cursor: pointer;
      background: var(--accent);
      color: white;
      border: none;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      table-layout: fixed;
    }

    th,
    td {
      border: 1px solid var(--line);
      padding: 6px 8px;
      vertical-align: top;
      word-wrap: break-word;
    }

    th {
      background: #efece4;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.06em;
    }

    th.no {
      width: 48px;
    }

    td.no {
      text-align: center;
      color: var(--muted);
    }

    .editable-cell {
      min-height: 28px;
      outline: none;
    }

    .editable-cell:focus {
      background: #fff8e6;
    }

    .toast {
      position: fixed;
      right: 24px;
      bottom: 24px;
      padding: 12px 18px;
      border-radius: 12px;
      color: white;
      box-shadow: var(--shadow);
      transition: opacity 200ms ease;
    }

    .toast.success {
      background: var(--success);
    }

    .toast.info {
      background: var(--info);
    }

    .toast.error {
      background: var(--error);
    }

    .toast.hidden {
      opacity: 0;
      pointer-events: none;
    }

    @media print {
      .controls,
      .toast {
        display: none;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Visitor Sign-In Sheet</h1>
        <p class="subtitle">Every entry is saved as you type.</p>
      </div>
      <div class="controls">
        <input type="date" id="sheetDate" value="{{DATE}}" />
        <button type="button" id="addRows">Add 5 rows</button>
        <button type="button" id="saveNow">Save</button>
      </div>
    </header>

    <table>
      <thead>
        <tr>
          <th class="no">No.</th>
          <th>Time In</th>
          <th>Name</th>
          <th>Visiting</th>
          <th>Address</th>
          <th>Purpose</th>
          <th>Time Out</th>
          <th>Remarks</th>
        </tr>
      </thead>
      <tbody id="tableBody"></tbody>
    </table>
  </main>

  <div id="toast" class="toast hidden" role="status" aria-live="polite"></div>

  <script>
    const FIELDS = [{{FIELDS}}];
    const TOAST_MS = {{TOAST_MS}};

    const dateInput = document.getElementById('sheetDate');
    const tbody = document.getElementById('tableBody');
    const toastEl = document.getElementById('toast');
    let activeDate = '';
    let hideTimer = null;
    let pending = Promise.resolve();
    let loadSeq = 0;

    const showToast = (toast) => {
      if (!toast) {
        return;
      }
      toastEl.textContent = toast.message;
      toastEl.className = `toast ${toast.kind}`;
      clearTimeout(hideTimer);
      hideTimer = setTimeout(() => {
        toastEl.classList.add('hidden');
      }, toast.hide_after_ms || TOAST_MS);
    };

    const reportError = async (res) => {
      showToast({ message: await res.text(), kind: 'error' });
    };

    const post = (url, body) =>
      fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body)
      });

    // Edits and loads share one queue, so requests reach the server in the
    // order the user made them.
    const enqueue = (task) => {
      pending = pending
        .then(task)
        .catch(() => showToast({ message: 'Connection lost', kind: 'error' }));
      return pending;
    };

    const sendEdit = (row, field, value) => {
      const date = activeDate;
      if (!date) {
        return;
      }
      enqueue(async () => {
        const res = await post('/api/cell', { date, row, field, value });
        if (!res.ok) {
          await reportError(res);
        }
      });
    };

    const appendRow = (view) => {
      const tr = document.createElement('tr');

      const tdNo = document.createElement('td');
      tdNo.className = 'no';
      tdNo.textContent = view.number;
      tr.appendChild(tdNo);

      FIELDS.forEach((field) => {
        const td = document.createElement('td');
        td.contentEditable = 'true';
        td.dataset.field = field;
        td.classList.add('editable-cell');
        td.innerText = view.fields[field] || '';
        td.addEventListener('input', () => sendEdit(view.number - 1, field, td.innerText));
        tr.appendChild(td);
      });

      tbody.appendChild(tr);
    };

    const blankRow = (number) => ({
      number,
      fields: Object.fromEntries(FIELDS.map((field) => [field, '']))
    });

    const loadData = () => {
      const date = dateInput.value;
      const seq = ++loadSeq;
      if (!date) {
        activeDate = '';
      }
      return enqueue(async () => {
        const url = date ? `/api/sheet?date=${encodeURIComponent(date)}` : '/api/sheet';
        const res = await fetch(url);
        if (seq !== loadSeq) {
          return;
        }
        if (!res.ok) {
          await reportError(res);
          return;
        }
        const data = await res.json();
        activeDate = data.date || '';
        if (!activeDate) {
          return;
        }
        tbody.innerHTML = '';
        data.rows.forEach(appendRow);
        showToast(data.toast);
      });
    };

    const addRows = (count) =>
      enqueue(async () => {
        if (!activeDate) {
          return;
        }
        const res = await post('/api/rows', { date: activeDate, count });
        if (!res.ok) {
          await reportError(res);
          return;
        }
        const start = tbody.children.length;
        for (let i = 0; i < count; i += 1) {
          appendRow(blankRow(start + i + 1));
        }
      });

    const saveNow = () =>
      enqueue(async () => {
        if (!activeDate) {
          return;
        }
        const res = await post('/api/save', { date: activeDate, silent: false });
        if (!res.ok) {
          await reportError(res);
          return;
        }
        showToast((await res.json()).toast);
      });

    document.addEventListener('DOMContentLoaded', () => {
      if (!dateInput.value) {
        dateInput.value = '{{DATE}}';
      }
      loadData();
      dateInput.addEventListener('change', loadData);
      document.getElementById('addRows').addEventListener('click', () => addRows(5));
      document.getElementById('saveNow').addEventListener('click', saveNow);
    });
  </script>
</body>
</html>
"#;
