//! Line-oriented menu driver.
//!
//! Reads a menu selection and bare identifiers, one line per prompt, calls
//! exactly one ledger operation per selection and prints its result line.

pub mod render;

use std::io::{self, BufRead, Write};

use crate::core::{Clock, Ledger, LedgerResult, Rejection, db::RecordStore};

pub const MENU_HEADER: &str = "===== Program Menu =====";
pub const NO_ACTIVE_BANNER: &str =
    "Warning: Before creating a project, you need to create and activate at least one contract.";
pub const SELECT_PROMPT: &str = "Select an action (1-8): ";
pub const INVALID_CHOICE: &str = "Invalid choice. Please try again.";
pub const EXITING: &str = "Exiting the program.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CreateProject,
    CreateContract,
    AddContractToProject,
    ConfirmContract,
    EndContract,
    ListContracts,
    ListProjects,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 8] = [
        MenuChoice::CreateProject,
        MenuChoice::CreateContract,
        MenuChoice::AddContractToProject,
        MenuChoice::ConfirmContract,
        MenuChoice::EndContract,
        MenuChoice::ListContracts,
        MenuChoice::ListProjects,
        MenuChoice::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuChoice::CreateProject => 1,
            MenuChoice::CreateContract => 2,
            MenuChoice::AddContractToProject => 3,
            MenuChoice::ConfirmContract => 4,
            MenuChoice::EndContract => 5,
            MenuChoice::ListContracts => 6,
            MenuChoice::ListProjects => 7,
            MenuChoice::Exit => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::CreateProject => "Create Project",
            MenuChoice::CreateContract => "Create Contract",
            MenuChoice::AddContractToProject => "Add Contract to Project",
            MenuChoice::ConfirmContract => "Confirm Contract",
            MenuChoice::EndContract => "End Contract",
            MenuChoice::ListContracts => "List Contracts",
            MenuChoice::ListProjects => "List Projects",
            MenuChoice::Exit => "Exit Program",
        }
    }

    /// Parse a menu selection; anything but a bare 1-8 is invalid.
    pub fn parse(input: &str) -> Option<Self> {
        let number: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|choice| choice.number() == number)
    }
}

/// Prompt/print surface over any line reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` without a newline and read one line. `None` at end of input.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn print(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    pub fn print_all<I>(&mut self, lines: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for line in lines {
            self.print(line)?;
        }
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Run the menu until Exit is chosen or input ends.
pub async fn run_menu<S, C, R, W>(ledger: &Ledger<S, C>, console: &mut Console<R, W>) -> anyhow::Result<()>
where
    S: RecordStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    loop {
        console.print("")?;
        console.print(MENU_HEADER)?;
        console.print("")?;
        // A failed check still draws the menu; the banner is shown.
        let has_active = match ledger.has_active_contracts().await {
            Ok(has_active) => has_active,
            Err(err) => {
                report(console, Err(err))?;
                false
            }
        };
        if !has_active {
            console.print(NO_ACTIVE_BANNER)?;
            console.print("")?;
        }
        for choice in MenuChoice::ALL {
            console.print(format!("{}. {}", choice.number(), choice.label()))?;
        }

        let Some(selection) = console.prompt(SELECT_PROMPT)? else {
            tracing::debug!("input closed at menu prompt");
            console.print(EXITING)?;
            return Ok(());
        };
        let Some(choice) = MenuChoice::parse(&selection) else {
            console.print(INVALID_CHOICE)?;
            continue;
        };
        tracing::debug!(?choice, "menu selection");
        if let Flow::Stop = dispatch(ledger, console, choice).await? {
            console.print(EXITING)?;
            return Ok(());
        }
    }
}

async fn dispatch<S, C, R, W>(
    ledger: &Ledger<S, C>,
    console: &mut Console<R, W>,
    choice: MenuChoice,
) -> anyhow::Result<Flow>
where
    S: RecordStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    match choice {
        MenuChoice::CreateProject => {
            match ledger.has_active_contracts().await {
                Ok(true) => {}
                Ok(false) => {
                    console.print(Rejection::PreconditionFailed.to_string())?;
                    return Ok(Flow::Continue);
                }
                Err(err) => {
                    report(console, Err(err))?;
                    return Ok(Flow::Continue);
                }
            }
            let Some(name) = console.prompt("Enter Project Name: ")? else {
                return Ok(Flow::Stop);
            };
            let result = ledger.create_project(&name).await;
            report(console, result.map(|project| render::project_created(&project)))?;
        }
        MenuChoice::CreateContract => {
            let Some(name) = console.prompt("Enter Contract Name: ")? else {
                return Ok(Flow::Stop);
            };
            let result = ledger.create_contract(&name).await;
            report(console, result.map(|contract| render::contract_created(&contract)))?;
        }
        MenuChoice::AddContractToProject => {
            let Some(contract) = console.prompt("Enter Contract Name: ")? else {
                return Ok(Flow::Stop);
            };
            let Some(project) = console.prompt("Enter Project Name: ")? else {
                return Ok(Flow::Stop);
            };
            let result = ledger.add_contract_to_project(&contract, &project).await;
            report(console, result.map(|contract| render::contract_linked(&contract)))?;
        }
        MenuChoice::ConfirmContract => {
            let Some(name) = console.prompt("Enter Contract Name: ")? else {
                return Ok(Flow::Stop);
            };
            let result = ledger.confirm_contract(&name).await;
            report(console, result.map(|contract| render::contract_confirmed(&contract)))?;
        }
        MenuChoice::EndContract => {
            let Some(name) = console.prompt("Enter Contract Name: ")? else {
                return Ok(Flow::Stop);
            };
            let result = ledger.end_contract(&name).await;
            report(console, result.map(|contract| render::contract_ended(&contract)))?;
        }
        MenuChoice::ListContracts => match ledger.list_contracts().await {
            Ok(contracts) => console.print_all(render::contract_listing(&contracts))?,
            Err(err) => report(console, Err(err))?,
        },
        MenuChoice::ListProjects => match ledger.list_projects().await {
            Ok(projects) => console.print_all(render::project_listing(&projects))?,
            Err(err) => report(console, Err(err))?,
        },
        MenuChoice::Exit => return Ok(Flow::Stop),
    }
    Ok(Flow::Continue)
}

/// Print the result line. Store failures are logged and shown but do not
/// end the session.
fn report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    result: LedgerResult<String>,
) -> io::Result<()> {
    match result {
        Ok(line) => console.print(line),
        Err(err) => {
            if err.rejection().is_none() {
                tracing::error!(error = %err, "ledger operation failed");
            }
            console.print(render::failure(&err))
        }
    }
}
