//! Command table and handlers: every user action funnels through here as
//! mutate, persist, recompute, render.

use chrono::{Local, NaiveDate};
use dialoguer::Confirm;

use crate::{
    errors::TrackerError,
    ledger::{is_suggested, Transaction, TransactionKind, SUGGESTED_CATEGORIES},
    report::Report,
    storage,
    summary::{self, SortKey},
    time::Clock,
    utils::format::{format_currency, relative_date},
};

use super::output;
use super::shell::{CliMode, CommandDefinition, CommandError, CommandResult, ShellContext};

const ADD_USAGE: &str = "add <category> <amount> <income|expense> <YYYY-MM-DD|today> [description…]";
const LIST_USAGE: &str = "list [income|expense] [latest|oldest|amount-high|amount-low]";
const EDIT_USAGE: &str = "edit <id> [<category> <amount> <income|expense> <YYYY-MM-DD|today> [description…]]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition {
            name: "help",
            usage: "help",
            description: "Show available commands",
            handler: handle_help,
        },
        CommandDefinition {
            name: "add",
            usage: ADD_USAGE,
            description: "Record a new transaction",
            handler: handle_add,
        },
        CommandDefinition {
            name: "list",
            usage: LIST_USAGE,
            description: "List transactions, optionally filtered and sorted",
            handler: handle_list,
        },
        CommandDefinition {
            name: "delete",
            usage: "delete <id>",
            description: "Delete a transaction by id",
            handler: handle_delete,
        },
        CommandDefinition {
            name: "edit",
            usage: EDIT_USAGE,
            description: "Replace a transaction (new id, moves to the top)",
            handler: handle_edit,
        },
        CommandDefinition {
            name: "budget",
            usage: "budget [amount]",
            description: "Show or set the monthly budget",
            handler: handle_budget,
        },
        CommandDefinition {
            name: "stats",
            usage: "stats",
            description: "Show totals, balance, and budget progress",
            handler: handle_stats,
        },
        CommandDefinition {
            name: "breakdown",
            usage: "breakdown",
            description: "Show per-category income and spending",
            handler: handle_breakdown,
        },
        CommandDefinition {
            name: "top",
            usage: "top [n]",
            description: "Show the biggest spending categories",
            handler: handle_top,
        },
        CommandDefinition {
            name: "report",
            usage: "report",
            description: "Generate a printable financial report",
            handler: handle_report,
        },
        CommandDefinition {
            name: "categories",
            usage: "categories",
            description: "List suggested categories",
            handler: handle_categories,
        },
        CommandDefinition {
            name: "export",
            usage: "export [path]",
            description: "Export all data as a JSON snapshot",
            handler: handle_export,
        },
        CommandDefinition {
            name: "import",
            usage: "import <path>",
            description: "Replace all data from a JSON snapshot",
            handler: handle_import,
        },
        CommandDefinition {
            name: "clear",
            usage: "clear",
            description: "Delete all transactions and the budget",
            handler: handle_clear,
        },
        CommandDefinition {
            name: "exit",
            usage: "exit",
            description: "Leave the shell",
            handler: handle_exit,
        },
    ]
}

fn usage(text: &str) -> CommandError {
    CommandError::Input(format!("usage: {text}"))
}

fn parse_amount(value: &str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .map_err(|_| TrackerError::Validation(format!("amount `{value}` is not a number")).into())
}

fn parse_kind(value: &str) -> Result<TransactionKind, CommandError> {
    TransactionKind::parse(value).ok_or_else(|| {
        TrackerError::Validation(format!(
            "type must be `income` or `expense`, got `{value}`"
        ))
        .into()
    })
}

fn parse_date(value: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        TrackerError::Validation(format!("date `{value}` is not a valid YYYY-MM-DD date")).into()
    })
}

fn confirm(app: &ShellContext, prompt: &str) -> Result<bool, CommandError> {
    if app.mode != CliMode::Interactive {
        return Ok(true);
    }
    Confirm::with_theme(&app.theme)
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(CommandError::from)
}

fn handle_help(app: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Commands");
    for definition in app.commands() {
        println!("  {:<52} {}", definition.usage, definition.description);
    }
    Ok(())
}

fn handle_add(app: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 4 {
        return Err(usage(ADD_USAGE));
    }
    let amount = parse_amount(args[1])?;
    let kind = parse_kind(args[2])?;
    let date = parse_date(args[3], app.today())?;
    let description = (args.len() > 4).then(|| args[4..].join(" "));
    let transaction = app
        .ledger
        .add_transaction(args[0], amount, kind, date, description)?;
    if !is_suggested(&transaction.category) {
        output::info(format!(
            "Recording under new category `{}`.",
            transaction.category
        ));
    }
    app.persist();
    output::success(format!("Transaction added ({}).", transaction.id));
    render_overview(app);
    Ok(())
}

fn handle_list(app: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut kind: Option<TransactionKind> = None;
    let mut sort: Option<SortKey> = None;
    for arg in args {
        if let Some(parsed) = TransactionKind::parse(arg) {
            kind = Some(parsed);
        } else if let Some(parsed) = SortKey::parse(arg) {
            sort = Some(parsed);
        } else {
            return Err(usage(LIST_USAGE));
        }
    }
    let rows = summary::filter_and_sort(&app.ledger.transactions, kind, sort);
    render_transactions(app, &rows);
    Ok(())
}

fn handle_delete(app: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage("delete <id>"));
    };
    if app.ledger.transaction(id).is_none() {
        output::warning(format!("No transaction with id `{id}`."));
        return Ok(());
    }
    if !confirm(app, "Delete this transaction?")? {
        output::info("Delete cancelled.");
        return Ok(());
    }
    app.ledger.delete_transaction(id);
    app.persist();
    output::success("Transaction deleted.");
    render_overview(app);
    Ok(())
}

fn handle_edit(app: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [id] => {
            match app.ledger.transaction(id) {
                Some(txn) => {
                    output::section("Edit");
                    println!("  category:    {}", txn.category);
                    println!("  amount:      {}", txn.amount);
                    println!("  type:        {}", txn.kind);
                    println!("  date:        {}", txn.date);
                    println!(
                        "  description: {}",
                        txn.description.as_deref().unwrap_or("-")
                    );
                    output::info(format!("Apply changes with `{EDIT_USAGE}`."));
                }
                None => output::warning(format!("No transaction with id `{id}`.")),
            }
            Ok(())
        }
        [id, category, amount, kind, date, rest @ ..] => {
            if app.ledger.transaction(id).is_none() {
                output::warning(format!("No transaction with id `{id}`."));
                return Ok(());
            }
            let amount = parse_amount(amount)?;
            let kind = parse_kind(kind)?;
            let date = parse_date(date, app.today())?;
            let description = (!rest.is_empty()).then(|| rest.join(" "));
            // Add first so a failed validation leaves the ledger untouched,
            // then drop the original. The replacement carries a fresh id and
            // sits at the top of the newest-first order.
            let replacement = app
                .ledger
                .add_transaction(category, amount, kind, date, description)?;
            app.ledger.delete_transaction(id);
            app.persist();
            output::success(format!("Transaction updated ({}).", replacement.id));
            render_overview(app);
            Ok(())
        }
        _ => Err(usage(EDIT_USAGE)),
    }
}

fn handle_budget(app: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            match summary::budget_progress(&app.ledger, app.today()) {
                Some(progress) => render_budget_progress(&progress),
                None => output::info("No budget set. Use `budget <amount>` to set one."),
            }
            Ok(())
        }
        [amount] => {
            let amount = parse_amount(amount)?;
            app.ledger.set_budget(amount)?;
            app.persist();
            output::success(format!(
                "Monthly budget set to {}.",
                format_currency(amount)
            ));
            render_overview(app);
            Ok(())
        }
        _ => Err(usage("budget [amount]")),
    }
}

fn handle_stats(app: &mut ShellContext, _args: &[&str]) -> CommandResult {
    render_overview(app);
    Ok(())
}

fn handle_breakdown(app: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let breakdown = summary::category_breakdown(&app.ledger);
    output::section("Category Breakdown");
    if breakdown.is_empty() {
        output::info("No data yet.");
        return Ok(());
    }
    for entry in &breakdown {
        let arrow = match entry.kind {
            TransactionKind::Income => "↑",
            TransactionKind::Expense => "↓",
        };
        println!(
            "  {:<16} {:>14}  {} {:.1}% of total",
            entry.category,
            format_currency(entry.amount),
            arrow,
            entry.percent
        );
    }
    Ok(())
}

fn handle_top(app: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args {
        [] => crate::report::TOP_CATEGORY_COUNT,
        [raw] => raw
            .parse::<usize>()
            .map_err(|_| CommandError::Input(format!("`{raw}` is not a count")))?,
        _ => return Err(usage("top [n]")),
    };
    let top = summary::top_expense_categories(&app.ledger, limit);
    output::section("Top Spending Categories");
    if top.is_empty() {
        output::info("No data yet.");
        return Ok(());
    }
    for entry in &top {
        println!("  {:<16} {:>14}", entry.category, format_currency(entry.total));
    }
    Ok(())
}

fn handle_report(app: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let report = Report::generate(&app.ledger, app.clock.now());
    output::section("Financial Report");
    println!("  Total Income:  {}", format_currency(report.total_income));
    println!("  Total Expense: {}", format_currency(report.total_expense));
    println!("  Balance:       {}", format_currency(report.balance));
    println!("  Transactions:  {}", report.transaction_count);
    if !report.top_expense_categories.is_empty() {
        println!();
        println!("  Top Spending Categories");
        for entry in &report.top_expense_categories {
            println!(
                "    {:<16} {:>14}",
                entry.category,
                format_currency(entry.total)
            );
        }
    }
    println!();
    println!(
        "  Report generated on {}",
        report
            .generated_at
            .with_timezone(&Local)
            .format("%-d %b %Y, %H:%M:%S")
    );
    Ok(())
}

fn handle_categories(_app: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Suggested Categories");
    for name in SUGGESTED_CATEGORIES {
        println!("  {name}");
    }
    output::info("Any other category name is accepted too.");
    Ok(())
}

fn handle_export(app: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args {
        [] => std::path::PathBuf::from(storage::DEFAULT_EXPORT_FILE_NAME),
        [path] => std::path::PathBuf::from(path),
        _ => return Err(usage("export [path]")),
    };
    storage::export_to_path(&app.ledger, &path)?;
    output::success(format!("Data exported to {}.", path.display()));
    Ok(())
}

fn handle_import(app: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage("import <path>"));
    };
    // A failed import leaves the current ledger untouched.
    let imported = storage::import_from_path(std::path::Path::new(path))?;
    app.ledger = imported;
    app.persist();
    output::success("Data imported successfully.");
    render_overview(app);
    Ok(())
}

fn handle_clear(app: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !confirm(app, "Delete all data?")? {
        output::info("Clear cancelled.");
        return Ok(());
    }
    app.ledger.clear_all();
    app.persist();
    output::success("All data cleared.");
    render_overview(app);
    Ok(())
}

fn handle_exit(_app: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

/// The render-all refresh shown after every mutating command.
pub(crate) fn render_overview(app: &ShellContext) {
    let ledger = &app.ledger;
    output::section("Overview");
    println!(
        "  Total Income:    {}",
        format_currency(summary::total_income(ledger))
    );
    println!(
        "  Total Expense:   {}",
        format_currency(summary::total_expense(ledger))
    );
    println!(
        "  Current Balance: {}",
        format_currency(summary::balance(ledger))
    );
    if let Some(progress) = summary::budget_progress(ledger, app.today()) {
        render_budget_progress(&progress);
    }
}

fn render_budget_progress(progress: &summary::BudgetProgress) {
    println!(
        "  Monthly Budget:  {} (spent {}, remaining {}, {:.0}% used)",
        format_currency(progress.budget),
        format_currency(progress.spent),
        format_currency(progress.remaining),
        progress.percentage
    );
}

fn render_transactions(app: &ShellContext, rows: &[Transaction]) {
    output::section(format!("Transactions ({})", rows.len()));
    if rows.is_empty() {
        output::info("No transactions found.");
        return;
    }
    let today = app.today();
    for txn in rows {
        let signed = match txn.kind {
            TransactionKind::Income => format!("+{}", format_currency(txn.amount)),
            TransactionKind::Expense => format!("-{}", format_currency(txn.amount)),
        };
        println!(
            "  {:<12} {:<16} {:>16}  {:<24} {}",
            relative_date(txn.date, today),
            txn.category,
            signed,
            txn.description.as_deref().unwrap_or("-"),
            txn.id
        );
    }
}
