use crate::catalog::CatalogBrowser;
use crate::explorer::{Explorer, ExplorerSnapshot};
use crate::models::{ActiveFilters, Dimension};
use crate::state::{LoadState, View};
use chrono::{DateTime, Local};
use std::fmt::Write;

const MENU: [(View, &str, &str, &str); 3] = [
    (View::Home, "/", "fa-solid fa-house", "Home"),
    (View::Catalog, "/agregados", "fa-solid fa-table-columns", "Agregados"),
    (View::Explorer, "/ipca", "fa-solid fa-line-chart", "IPCA"),
];

pub fn render_home() -> String {
    render_page(View::Home, "Home", HOME_HTML)
}

pub fn render_catalog(state: &LoadState<CatalogBrowser>) -> String {
    let body = match state {
        LoadState::Loaded { data, fetched_at } => catalog_table(data, fetched_at),
        other => load_notice(other),
    };
    let content = format!(
        r#"<section class="card">
  <h4 class="title"><i class="fa-solid fa-folder-open"></i> Catálogo de Agregados</h4>
  {body}
</section>"#
    );
    render_page(View::Catalog, "Agregados", &content)
}

pub fn render_explorer(state: &LoadState<Explorer>) -> String {
    let body = match state {
        LoadState::Loaded { data, fetched_at } => explorer_body(&data.snapshot(), fetched_at),
        other => load_notice(other),
    };
    let content = format!(
        r#"<section class="card">
  <h4 class="title"><i class="fa-solid fa-hand-holding-dollar"></i> Índice Nacional de Preços ao Consumidor Amplo - Índices de Preços</h4>
  {body}
</section>"#
    );
    render_page(View::Explorer, "IPCA", &content)
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn render_page(active: View, title: &str, content: &str) -> String {
    let mut nav = String::new();
    for (view, href, icon, label) in MENU {
        let class = if view == active { "menu-item active" } else { "menu-item" };
        let _ = write!(
            nav,
            r#"<a class="{class}" href="{href}" title="{label}"><i class="{icon}"></i><span>{label}</span></a>"#
        );
    }
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{NAV}}", &nav)
        .replace("{{CONTENT}}", content)
}

fn load_notice<T>(state: &LoadState<T>) -> String {
    match state {
        LoadState::Failed { message } => format!(
            r#"<div class="alert error" role="alert"><i class="fa-solid fa-triangle-exclamation"></i> Não foi possível carregar os dados: {}</div>"#,
            escape_html(message)
        ),
        _ => r#"<div class="alert info" role="status"><i class="fa-solid fa-spinner"></i> Carregando dados...</div>"#
            .to_string(),
    }
}

fn fetched_line(fetched_at: &DateTime<Local>) -> String {
    format!(
        r#"<p class="muted">Atualizado em {}</p>"#,
        fetched_at.format("%d/%m/%Y %H:%M:%S")
    )
}

fn catalog_table(browser: &CatalogBrowser, fetched_at: &DateTime<Local>) -> String {
    let mut rows = String::new();
    for entry in browser.entries() {
        let selected = browser.selection().is_selected(&entry.id);
        let id = escape_html(&entry.id);
        let name = escape_html(&entry.name);
        let _ = write!(
            rows,
            r#"<tr class="{class}"><td><form method="post" action="/agregados/select"><input type="hidden" name="id" value="{id}" /><button type="submit" class="row-button">{id}</button></form></td><td>{name}</td><td>{count}</td></tr>"#,
            class = if selected { "selected" } else { "" },
            count = entry.subentries.len(),
        );
        if selected {
            let mut items = String::new();
            for sub in &entry.subentries {
                let _ = write!(
                    items,
                    r#"<li class="list-item">{} - {}</li>"#,
                    escape_html(&sub.id),
                    escape_html(&sub.name)
                );
            }
            let _ = write!(
                rows,
                r#"<tr class="details"><td colspan="3"><div class="detail-card"><strong>Agregados {id} - {name}:</strong><ul class="list">{items}</ul></div></td></tr>"#
            );
        }
    }

    format!(
        r#"{fetched}
  <table class="table">
    <thead><tr><th>ID</th><th>Nome</th><th>Quantidade de Agregados</th></tr></thead>
    <tbody>{rows}</tbody>
  </table>"#,
        fetched = fetched_line(fetched_at),
    )
}

fn explorer_body(snapshot: &ExplorerSnapshot, fetched_at: &DateTime<Local>) -> String {
    let mut html = fetched_line(fetched_at);
    html.push_str(&filter_panel(snapshot));
    html.push_str(&filter_notice(snapshot));
    html.push_str(&value_table(snapshot));
    html.push_str(&pager(snapshot));
    if snapshot.filtered_records == 0 && snapshot.total_records > 0 {
        html.push_str(
            r#"<div class="alert warning" role="alert"><i class="fa-solid fa-exclamation-triangle"></i> Nenhum dado encontrado com os filtros aplicados.</div>"#,
        );
    }
    html
}

fn filter_panel(snapshot: &ExplorerSnapshot) -> String {
    let filters = &snapshot.filters;
    let mut html = String::from(
        r#"<div class="card inner"><h4 class="card-header"><i class="fa-solid fa-filter"></i> Filtros</h4>"#,
    );

    html.push_str(r#"<div class="filter-group"><h5><i class="fas fa-calendar-alt"></i> Meses</h5>"#);
    for (year, periods) in &snapshot.periods_by_year {
        let _ = write!(
            html,
            r#"<div class="year"><h6><i class="fas fa-calendar"></i> {}</h6><div class="options">"#,
            escape_html(year)
        );
        for period in periods {
            html.push_str(&filter_option(filters, Dimension::Period, period));
        }
        html.push_str("</div></div>");
    }
    html.push_str("</div>");

    for (dimension, icon, heading, values) in [
        (Dimension::Variable, "fas fa-chart-line", "Variável", &snapshot.vocabulary.variable),
        (Dimension::Group, "fas fa-layer-group", "Grupo", &snapshot.vocabulary.group),
    ] {
        let _ = write!(
            html,
            r#"<div class="filter-group"><h5><i class="{icon}"></i> {heading}</h5><div class="options column">"#
        );
        for value in values {
            html.push_str(&filter_option(filters, dimension, value));
        }
        html.push_str("</div></div>");
    }

    let disabled = if filters.is_empty() { " disabled" } else { "" };
    let _ = write!(
        html,
        r#"<form method="post" action="/ipca/clear" class="actions"><button type="submit" class="btn danger"{disabled}><i class="fa-solid fa-trash"></i> Limpar Filtros</button></form></div>"#
    );
    html
}

fn filter_option(filters: &ActiveFilters, dimension: Dimension, value: &str) -> String {
    let checked = filters.contains(dimension, value);
    let escaped = escape_html(value);
    format!(
        r#"<form method="post" action="/ipca/toggle" class="option"><input type="hidden" name="dimension" value="{dimension}" /><input type="hidden" name="value" value="{escaped}" /><button type="submit" class="check{class}" aria-pressed="{checked}"><i class="{icon}"></i> {escaped}</button></form>"#,
        dimension = dimension.as_str(),
        class = if checked { " checked" } else { "" },
        icon = if checked { "fa-solid fa-square-check" } else { "fa-regular fa-square" },
    )
}

fn filter_notice(snapshot: &ExplorerSnapshot) -> String {
    if snapshot.total_records == 0 {
        return String::new();
    }
    let filters = &snapshot.filters;
    if filters.is_empty() {
        return r#"<div class="alert info" role="alert"><i class="fa-solid fa-circle-question"></i> Escolha os filtros para selecionar os dados.</div>"#
            .to_string();
    }

    let mut badges = String::new();
    for (dimension, label, tone) in [
        (Dimension::Period, "Períodos", "primary"),
        (Dimension::Variable, "Variáveis", "success"),
        (Dimension::Group, "Grupos", "warning"),
    ] {
        let count = filters.get(dimension).len();
        if count > 0 {
            let _ = write!(badges, r#"<span class="badge {tone}">{label}: {count}</span>"#);
        }
    }
    format!(
        r#"<div class="alert info" role="alert"><i class="fa-solid fa-info-circle"></i> <strong>Filtros aplicados:</strong>{badges}</div>"#
    )
}

fn value_table(snapshot: &ExplorerSnapshot) -> String {
    let mut rows = String::new();
    for record in &snapshot.rows {
        let _ = write!(
            rows,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="number">{}</td></tr>"#,
            escape_html(&record.period_name),
            escape_html(&record.variable_name),
            escape_html(&record.group_name),
            escape_html(&record.value)
        );
    }

    let mut html = format!(
        r#"<table class="table">
    <thead><tr><th>Mês</th><th>Variável</th><th>Geral, grupo, subgrupo, item e subitem</th><th>Valor (%)</th></tr></thead>
    <tbody>{rows}</tbody>
  </table>
  <div class="summary"><span class="muted">Mostrando {} a {} de {} registros</span>"#,
        snapshot.showing_from, snapshot.showing_to, snapshot.filtered_records
    );
    if snapshot.total_pages > 0 {
        let _ = write!(
            html,
            r#"<span class="muted">Página {} de {}</span>"#,
            snapshot.page, snapshot.total_pages
        );
    }
    html.push_str("</div>");
    html
}

fn pager(snapshot: &ExplorerSnapshot) -> String {
    let (page, total) = (snapshot.page, snapshot.total_pages);
    if total <= 1 {
        return String::new();
    }

    let mut html = String::from(r#"<nav aria-label="Navegação da tabela"><ul class="pagination">"#);
    html.push_str(&page_button("&laquo;&laquo;", 1, page == 1, false, "Primeira página"));
    html.push_str(&page_button("&laquo;", page.saturating_sub(1).max(1), page == 1, false, "Página anterior"));
    for number in &snapshot.page_window {
        let label = number.to_string();
        let aria = format!("Página {number}");
        html.push_str(&page_button(&label, *number, false, *number == page, &aria));
    }
    html.push_str(&page_button("&raquo;", (page + 1).min(total), page == total, false, "Próxima página"));
    html.push_str(&page_button("&raquo;&raquo;", total, page == total, false, "Última página"));
    html.push_str("</ul></nav>");
    html
}

fn page_button(label: &str, target: usize, disabled: bool, active: bool, aria: &str) -> String {
    let class = match (disabled, active) {
        (true, _) => "page-item disabled",
        (_, true) => "page-item active",
        _ => "page-item",
    };
    format!(
        r#"<li class="{class}"><form method="post" action="/ipca/page"><input type="hidden" name="page" value="{target}" /><button type="submit" class="page-link" aria-label="{aria}"{disabled}>{label}</button></form></li>"#,
        disabled = if disabled { " disabled" } else { "" },
    )
}

const HOME_HTML: &str = r#"<section class="card home">
  <h2>Mural</h2>
  <p class="lead">Bem-vindo ao painel de dados do IBGE!</p>
  <ul>
    <li>Na aba <a href="/agregados">Agregados</a>, você pode visualizar o catálogo de agregados da API do IBGE.</li>
    <li>Na aba <a href="/ipca">IPCA</a>, você pode filtrar os dados por período, variável e grupo. Ela corresponde à pesquisa "Índice Nacional de Preços ao Consumidor Amplo" (tabela 1419 da API Sidra).</li>
  </ul>
</section>"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Painel IBGE</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css" crossorigin="anonymous" referrerpolicy="no-referrer" />
  <style>
    :root {
      --sidebar: #3F4D67;
      --header: #2E598E;
      --selected: #2063a2;
      --ink: #212529;
      --muted: #6c757d;
      --line: #dee2e6;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      display: flex;
      min-height: 100vh;
      font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
      color: var(--ink);
      background: #f4f6f9;
    }

    .sidebar {
      width: 72px;
      background: var(--sidebar);
      display: flex;
      flex-direction: column;
      gap: 8px;
      padding: 12px 8px;
      position: sticky;
      top: 0;
      height: 100vh;
    }

    .menu-item {
      display: flex;
      flex-direction: column;
      align-items: center;
      gap: 4px;
      padding: 10px 4px;
      border-radius: 6px;
      color: rgba(255, 255, 255, 0.7);
      text-decoration: none;
      font-size: 0.75rem;
    }

    .menu-item i {
      font-size: 1.1rem;
    }

    .menu-item.active {
      background: #0d6efd;
      color: white;
    }

    main {
      flex: 1;
      padding: 32px;
      max-width: 1200px;
    }

    .card {
      background: white;
      border-radius: 8px;
      box-shadow: 0 2px 6px rgba(0, 0, 0, 0.08);
      padding: 24px;
      margin-bottom: 24px;
    }

    .card.inner {
      border: 1px solid var(--line);
      box-shadow: none;
      padding: 0 16px 16px;
    }

    .card-header {
      margin: 0 -16px 16px;
      padding: 12px 16px;
      background: #f8f9fa;
      border-bottom: 1px solid var(--line);
    }

    .title {
      margin-top: 0;
    }

    .muted {
      color: var(--muted);
    }

    .table {
      width: 100%;
      border-collapse: collapse;
      margin: 16px 0;
    }

    .table thead {
      background: var(--header);
      color: white;
    }

    .table th,
    .table td {
      padding: 8px 12px;
      text-align: left;
      border-bottom: 1px solid var(--line);
    }

    .table tbody tr:nth-child(even) {
      background: #f8f9fa;
    }

    .table tr.selected {
      background: var(--selected);
      color: white;
    }

    .table td.number {
      text-align: right;
    }

    .row-button {
      background: none;
      border: none;
      color: inherit;
      font: inherit;
      cursor: pointer;
      text-decoration: underline;
    }

    .detail-card {
      border: 1px solid var(--line);
      border-radius: 6px;
      padding: 12px;
    }

    .list {
      list-style: none;
      padding: 0;
      margin: 8px 0 0;
    }

    .list-item {
      padding: 6px 10px;
      border: 1px solid var(--line);
      margin-top: -1px;
    }

    .filter-group {
      margin-bottom: 20px;
    }

    .filter-group h5 {
      color: var(--muted);
    }

    .year h6 {
      font-weight: bold;
      color: var(--muted);
      border-bottom: 1px solid var(--line);
      padding-bottom: 6px;
    }

    .options {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      margin-left: 16px;
    }

    .options.column {
      flex-direction: column;
      align-items: flex-start;
    }

    .option {
      margin: 0;
    }

    .check {
      background: none;
      border: 1px solid transparent;
      border-radius: 4px;
      padding: 4px 6px;
      cursor: pointer;
      font: inherit;
      color: inherit;
    }

    .check.checked {
      border-color: #0d6efd;
      color: #0d6efd;
    }

    .actions {
      display: flex;
      justify-content: flex-end;
    }

    .btn {
      padding: 8px 14px;
      border-radius: 6px;
      cursor: pointer;
      font: inherit;
      background: white;
    }

    .btn.danger {
      border: 1px solid #dc3545;
      color: #dc3545;
    }

    .btn:disabled {
      opacity: 0.5;
      cursor: default;
    }

    .alert {
      padding: 12px 16px;
      border-radius: 6px;
      margin: 16px 0;
    }

    .alert.info {
      background: #cff4fc;
      color: #055160;
    }

    .alert.warning {
      background: #fff3cd;
      color: #664d03;
    }

    .alert.error {
      background: #f8d7da;
      color: #842029;
    }

    .badge {
      display: inline-block;
      margin-left: 8px;
      padding: 2px 8px;
      border-radius: 4px;
      color: white;
      font-size: 0.8rem;
    }

    .badge.primary {
      background: #0d6efd;
    }

    .badge.success {
      background: #198754;
    }

    .badge.warning {
      background: #ffc107;
      color: var(--ink);
    }

    .summary {
      display: flex;
      justify-content: space-between;
      flex-wrap: wrap;
      margin-bottom: 12px;
    }

    .pagination {
      display: flex;
      justify-content: center;
      flex-wrap: wrap;
      list-style: none;
      padding: 0;
    }

    .pagination form {
      margin: 0;
    }

    .page-link {
      min-width: 40px;
      padding: 6px 10px;
      border: 1px solid var(--line);
      background: white;
      color: #0d6efd;
      cursor: pointer;
      font: inherit;
    }

    .page-item.active .page-link {
      background: #0d6efd;
      color: white;
    }

    .page-item.disabled .page-link {
      color: var(--muted);
      cursor: default;
    }

    @media (max-width: 600px) {
      main {
        padding: 16px;
      }
      .menu-item span {
        display: none;
      }
    }
  </style>
</head>
<body>
  <nav class="sidebar">{{NAV}}</nav>
  <main>
{{CONTENT}}
  </main>
</body>
</html>
"#;
