//! Subcommands and their execution against a [`Session`].

use std::fmt::Display;

use anyhow::{Context as _, bail};
use clap::Subcommand;
use roster_core::{
  Handle, Session,
  department::DepartmentId,
  employee::EmployeeId,
  review::ReviewId,
};
use roster_store_sqlite::SqliteStore;
use serde::Serialize;

type StoreSession = Session<SqliteStore, SqliteStore>;

// ─── CLI surface ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
pub enum Command {
  /// Create the departments, employees and reviews tables.
  Init,
  /// Drop the reviews, employees and departments tables.
  Reset,
  #[command(subcommand)]
  Department(DepartmentCommand),
  #[command(subcommand)]
  Employee(EmployeeCommand),
  #[command(subcommand)]
  Review(ReviewCommand),
}

#[derive(Subcommand)]
pub enum DepartmentCommand {
  /// Add a department and print its id.
  Add { name: String },
}

#[derive(Subcommand)]
pub enum EmployeeCommand {
  Add {
    #[arg(long)]
    name:       String,
    #[arg(long)]
    job_title:  String,
    #[arg(long)]
    department: i64,
  },
  List,
  /// Show an employee and every review filed against them.
  Show { id: i64 },
  Update {
    id:         i64,
    #[arg(long)]
    name:       Option<String>,
    #[arg(long)]
    job_title:  Option<String>,
    #[arg(long)]
    department: Option<i64>,
  },
}

#[derive(Subcommand)]
pub enum ReviewCommand {
  Add {
    #[arg(long)]
    year:     i64,
    #[arg(long)]
    summary:  String,
    #[arg(long)]
    employee: i64,
  },
  List {
    /// Only reviews filed against this employee.
    #[arg(long)]
    employee: Option<i64>,
  },
  Show { id: i64 },
  Update {
    id:       i64,
    #[arg(long)]
    year:     Option<i64>,
    #[arg(long)]
    summary:  Option<String>,
    #[arg(long)]
    employee: Option<i64>,
  },
  Delete { id: i64 },
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

pub async fn run(command: Command, store: &SqliteStore, json: bool) -> anyhow::Result<()> {
  let session = store.session();
  match command {
    Command::Init => {
      store.create_departments_table().await?;
      session.employees().create_table().await?;
      session.reviews().create_table().await?;
      tracing::info!("tables created");
    }
    Command::Reset => {
      session.reviews().drop_table().await?;
      session.employees().drop_table().await?;
      store.drop_departments_table().await?;
      tracing::info!("tables dropped");
    }
    Command::Department(DepartmentCommand::Add { name }) => {
      let id = store.add_department(name).await?;
      println!("{id}");
    }
    Command::Employee(cmd) => employee(cmd, &session, json).await?,
    Command::Review(cmd) => review(cmd, &session, json).await?,
  }
  Ok(())
}

async fn employee(cmd: EmployeeCommand, session: &StoreSession, json: bool) -> anyhow::Result<()> {
  let employees = session.employees();
  match cmd {
    EmployeeCommand::Add { name, job_title, department } => {
      let employee = employees
        .create(name, job_title, DepartmentId(department))
        .await?;
      emit(&employee, json)?;
    }
    EmployeeCommand::List => emit_all(&employees.get_all().await?, json)?,
    EmployeeCommand::Show { id } => {
      let employee = employees
        .find_by_id(EmployeeId(id))
        .await?
        .with_context(|| format!("no employee with id {id}"))?;
      emit(&employee, json)?;
      emit_all(&employees.reviews(&employee).await?, json)?;
    }
    EmployeeCommand::Update { id, name, job_title, department } => {
      let employee = employees
        .find_by_id(EmployeeId(id))
        .await?
        .with_context(|| format!("no employee with id {id}"))?;
      if let Some(name) = name {
        employee.write().set_name(name)?;
      }
      if let Some(job_title) = job_title {
        employee.write().set_job_title(job_title)?;
      }
      if let Some(department) = department {
        employees
          .set_department(&employee, DepartmentId(department))
          .await?;
      }
      employees.update(&employee).await?;
      emit(&employee, json)?;
    }
  }
  Ok(())
}

async fn review(cmd: ReviewCommand, session: &StoreSession, json: bool) -> anyhow::Result<()> {
  let reviews = session.reviews();
  match cmd {
    ReviewCommand::Add { year, summary, employee } => {
      let review = reviews.create(year, summary, EmployeeId(employee)).await?;
      emit(&review, json)?;
    }
    ReviewCommand::List { employee } => {
      let all = match employee {
        Some(id) => reviews.for_employee(EmployeeId(id)).await?,
        None => reviews.get_all().await?,
      };
      emit_all(&all, json)?;
    }
    ReviewCommand::Show { id } => {
      let review = reviews
        .find_by_id(ReviewId(id))
        .await?
        .with_context(|| format!("no review with id {id}"))?;
      emit(&review, json)?;
    }
    ReviewCommand::Update { id, year, summary, employee } => {
      let review = reviews
        .find_by_id(ReviewId(id))
        .await?
        .with_context(|| format!("no review with id {id}"))?;
      if let Some(year) = year {
        review.write().set_year(year)?;
      }
      if let Some(summary) = summary {
        review.write().set_summary(summary)?;
      }
      if let Some(employee) = employee {
        reviews.set_employee(&review, EmployeeId(employee)).await?;
      }
      reviews.update(&review).await?;
      emit(&review, json)?;
    }
    ReviewCommand::Delete { id } => {
      let Some(review) = reviews.find_by_id(ReviewId(id)).await? else {
        bail!("no review with id {id}");
      };
      reviews.delete(&review).await?;
      tracing::info!(id, "review deleted");
    }
  }
  Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────

fn emit<T: Serialize + Display>(item: &Handle<T>, json: bool) -> anyhow::Result<()> {
  let item = item.read();
  if json {
    println!("{}", serde_json::to_string(&*item)?);
  } else {
    println!("{item}");
  }
  Ok(())
}

fn emit_all<T: Serialize + Display + Clone>(
  items: &[Handle<T>],
  json: bool,
) -> anyhow::Result<()> {
  if json {
    let snapshots: Vec<T> = items.iter().map(Handle::snapshot).collect();
    println!("{}", serde_json::to_string(&snapshots)?);
  } else {
    for item in items {
      println!("{}", *item.read());
    }
  }
  Ok(())
}
