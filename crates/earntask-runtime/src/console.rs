//! # Operator Console
//!
//! Line-oriented front end over the state store. Every command maps onto one
//! named store operation or one read of the snapshot; the console never
//! touches entities directly, which is what keeps the store's atomicity
//! guarantees intact.
//!
//! Ids may be given as unambiguous prefixes of the full UUID.

use std::fmt::Write as _;
use std::fs;

use uuid::Uuid;

use earntask_state::{
    Amount, Network, ReviewVerdict, StateStore, TaskDraft, TaskStatus, TaskUpdate,
};

/// Result of handling one input line.
pub enum Outcome {
    Reply(String),
    Quit,
}

/// The console session, holding the store it drives.
pub struct Console {
    store: StateStore,
}

impl Console {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Handle one input line and produce the reply to print.
    pub fn handle(&mut self, line: &str) -> Outcome {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Outcome::Reply(String::new());
        };
        let args: Vec<&str> = words.collect();

        let reply = match command {
            "quit" | "exit" => return Outcome::Quit,
            "help" => help_text(),
            "login" => self.login(&args),
            "register" => self.register(&args),
            "logout" => {
                self.store.logout();
                "Logged out".to_string()
            }
            "whoami" => self.whoami(),
            "tasks" => self.list_tasks(),
            "task-add" => self.task_add(&args),
            "task-hold" => self.task_set_status(&args, TaskStatus::Hold),
            "task-publish" => self.task_set_status(&args, TaskStatus::Published),
            "task-delete" => self.task_delete(&args),
            "submit" => self.submit(&args),
            "subs" => self.list_submissions(),
            "approve-sub" => self.review_submission(&args, ReviewVerdict::Approved),
            "reject-sub" => self.review_submission(&args, ReviewVerdict::Rejected),
            "withdraw" => self.withdraw(&args),
            "withdrawals" => self.list_withdrawals(),
            "approve-wd" => self.review_withdrawal(&args, ReviewVerdict::Approved),
            "reject-wd" => self.review_withdrawal(&args, ReviewVerdict::Rejected),
            "users" => self.list_users(),
            "toggle" => self.toggle_user(&args),
            "currency" => self.currency(&args),
            "logs" => self.list_logs(),
            other => format!("Unknown command: {other} (try `help`)"),
        };
        Outcome::Reply(reply)
    }

    fn login(&mut self, args: &[&str]) -> String {
        let &[email, password] = args else {
            return "Usage: login <email> <password>".to_string();
        };
        match self.store.authenticate(email, password) {
            Ok(user) => format!("Logged in as {} ({:?})", user.email, user.role),
            Err(err) => err.to_string(),
        }
    }

    fn register(&mut self, args: &[&str]) -> String {
        let &[email, password] = args else {
            return "Usage: register <email> <password>".to_string();
        };
        match self.store.register(email, password) {
            Ok(user) => format!("Registered and logged in as {}", user.email),
            Err(err) => err.to_string(),
        }
    }

    fn whoami(&self) -> String {
        match self.store.current_user() {
            Some(user) => {
                let currency = &self.store.state().currency;
                format!(
                    "{} ({:?}, {:?}) balance {}{}",
                    user.email, user.role, user.status, currency.symbol, user.balance
                )
            }
            None => "Not logged in".to_string(),
        }
    }

    fn list_tasks(&self) -> String {
        let currency = &self.store.state().currency;
        let mut out = String::new();
        for task in self.store.visible_tasks() {
            let _ = writeln!(
                out,
                "{}  {:?}  {}{}  {}/{}  {}",
                short(task.id),
                task.status,
                currency.symbol,
                task.reward,
                task.completed_count,
                task.quantity,
                task.title
            );
        }
        if out.is_empty() {
            out.push_str("No tasks");
        }
        out
    }

    fn task_add(&mut self, args: &[&str]) -> String {
        if args.len() < 3 {
            return "Usage: task-add <reward> <quantity> <title...>".to_string();
        }
        let Ok(reward) = args[0].parse::<Amount>() else {
            return "Invalid reward amount".to_string();
        };
        let Ok(quantity) = args[1].parse::<u32>() else {
            return "Invalid quantity".to_string();
        };
        let draft = TaskDraft {
            title: args[2..].join(" "),
            description: String::new(),
            reward,
            quantity,
            instruction: String::new(),
            status: TaskStatus::Published,
        };
        match self.store.create_task(draft) {
            Ok(task) => format!("Created task {} ({})", short(task.id), task.title),
            Err(err) => err.to_string(),
        }
    }

    fn task_set_status(&mut self, args: &[&str], status: TaskStatus) -> String {
        let id = match self.resolve_task(args) {
            Ok(id) => id,
            Err(msg) => return msg,
        };
        let update = TaskUpdate {
            status: Some(status),
            ..Default::default()
        };
        match self.store.update_task(id, update) {
            Some(task) => format!("Task {} is now {:?}", short(task.id), task.status),
            None => "Task not found".to_string(),
        }
    }

    fn task_delete(&mut self, args: &[&str]) -> String {
        let id = match self.resolve_task(args) {
            Ok(id) => id,
            Err(msg) => return msg,
        };
        self.store.delete_task(id);
        format!("Task {} deleted", short(id))
    }

    fn submit(&mut self, args: &[&str]) -> String {
        let &[task_ref, path] = args else {
            return "Usage: submit <task-id> <image-path>".to_string();
        };
        let id = match self.resolve_task(&[task_ref]) {
            Ok(id) => id,
            Err(msg) => return msg,
        };
        let payload = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => return format!("Cannot read {path}: {err}"),
        };
        let size = payload.len() as u64;
        match self.store.submit_proof(id, payload, size) {
            Ok(sub) => format!("Submitted proof {} for review", short(sub.id)),
            Err(err) => err.to_string(),
        }
    }

    fn list_submissions(&self) -> String {
        let mut out = String::new();
        for sub in &self.store.state().submissions {
            let _ = writeln!(
                out,
                "{}  {:?}  {}  {}  reward {}",
                short(sub.id),
                sub.status,
                sub.user_email,
                sub.task_title,
                sub.reward
            );
        }
        if out.is_empty() {
            out.push_str("No submissions");
        }
        out
    }

    fn review_submission(&mut self, args: &[&str], verdict: ReviewVerdict) -> String {
        if args.is_empty() {
            return "Usage: approve-sub|reject-sub <id> [note...]".to_string();
        }
        let candidates: Vec<Uuid> = self
            .store
            .state()
            .submissions
            .iter()
            .map(|s| s.id)
            .collect();
        let id = match resolve(&candidates, args[0]) {
            Ok(id) => id,
            Err(msg) => return msg,
        };
        let note = (args.len() > 1).then(|| args[1..].join(" "));
        match self.store.review_submission(id, verdict, note) {
            Ok(()) => format!("Submission {} reviewed", short(id)),
            Err(err) => err.to_string(),
        }
    }

    fn withdraw(&mut self, args: &[&str]) -> String {
        let &[amount, network, address] = args else {
            return "Usage: withdraw <amount> <bep20|trc20> <address>".to_string();
        };
        let Ok(amount) = amount.parse::<Amount>() else {
            return "Invalid amount".to_string();
        };
        let network = match network.to_ascii_lowercase().as_str() {
            "bep20" => Network::Bep20,
            "trc20" => Network::Trc20,
            _ => return "Network must be bep20 or trc20".to_string(),
        };
        match self
            .store
            .request_withdrawal(amount, network, address.to_string())
        {
            Ok(req) => format!("Withdrawal {} queued ({} {})", short(req.id), req.amount, network),
            Err(err) => err.to_string(),
        }
    }

    fn list_withdrawals(&self) -> String {
        let mut out = String::new();
        for req in &self.store.state().withdrawals {
            let _ = writeln!(
                out,
                "{}  {:?}  {}  {}  {}  {}",
                short(req.id),
                req.status,
                req.user_email,
                req.amount,
                req.network,
                req.address
            );
        }
        if out.is_empty() {
            out.push_str("No withdrawals");
        }
        out
    }

    fn review_withdrawal(&mut self, args: &[&str], verdict: ReviewVerdict) -> String {
        let &[wd_ref] = args else {
            return "Usage: approve-wd|reject-wd <id>".to_string();
        };
        let candidates: Vec<Uuid> = self
            .store
            .state()
            .withdrawals
            .iter()
            .map(|w| w.id)
            .collect();
        let id = match resolve(&candidates, wd_ref) {
            Ok(id) => id,
            Err(msg) => return msg,
        };
        match self.store.review_withdrawal(id, verdict) {
            Ok(()) => format!("Withdrawal {} reviewed", short(id)),
            Err(err) => err.to_string(),
        }
    }

    fn list_users(&self) -> String {
        let mut out = String::new();
        for user in &self.store.state().users {
            let _ = writeln!(
                out,
                "{}  {:?}  {:?}  {}  {}",
                short(user.id),
                user.role,
                user.status,
                user.balance,
                user.email
            );
        }
        out
    }

    fn toggle_user(&mut self, args: &[&str]) -> String {
        let &[user_ref] = args else {
            return "Usage: toggle <user-id>".to_string();
        };
        let candidates: Vec<Uuid> = self.store.state().users.iter().map(|u| u.id).collect();
        let id = match resolve(&candidates, user_ref) {
            Ok(id) => id,
            Err(msg) => return msg,
        };
        self.store.toggle_user_status(id);
        match self.store.state().user(id) {
            Some(user) => format!("User {} is now {:?}", short(id), user.status),
            None => "User not found".to_string(),
        }
    }

    fn currency(&mut self, args: &[&str]) -> String {
        let &[symbol, code] = args else {
            return "Usage: currency <symbol> <code>".to_string();
        };
        self.store.update_currency(symbol, code);
        format!("Currency set to {symbol} ({code})")
    }

    fn list_logs(&self) -> String {
        let mut out = String::new();
        for entry in self.store.state().logs.iter().take(20) {
            let _ = writeln!(
                out,
                "{}  {:?}  {}  {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.severity,
                entry.user,
                entry.action
            );
        }
        if out.is_empty() {
            out.push_str("No log entries");
        }
        out
    }

    fn resolve_task(&self, args: &[&str]) -> Result<Uuid, String> {
        let &[task_ref] = args else {
            return Err("Expected a task id".to_string());
        };
        let candidates: Vec<Uuid> = self.store.state().tasks.iter().map(|t| t.id).collect();
        resolve(&candidates, task_ref)
    }

    /// Count pending review work, shown at startup.
    pub fn pending_summary(&self) -> String {
        format!(
            "{} submissions and {} withdrawals pending review",
            self.store.pending_submissions().len(),
            self.store.pending_withdrawals().len()
        )
    }
}

/// Resolve a UUID by unambiguous string prefix.
fn resolve(candidates: &[Uuid], prefix: &str) -> Result<Uuid, String> {
    let matches: Vec<Uuid> = candidates
        .iter()
        .copied()
        .filter(|id| id.to_string().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("No id matching {prefix}")),
        _ => Err(format!("Ambiguous id prefix {prefix}")),
    }
}

/// First 8 hex characters, enough to act on interactively.
fn short(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn help_text() -> String {
    "\
Commands:
  login <email> <password>      register <email> <password>
  logout                        whoami
  tasks                         task-add <reward> <qty> <title...>
  task-hold <id>                task-publish <id>
  task-delete <id>              submit <task-id> <image-path>
  subs                          approve-sub <id> [note] / reject-sub <id> [note]
  withdraw <amt> <net> <addr>   withdrawals
  approve-wd <id>               reject-wd <id>
  users                         toggle <user-id>
  currency <symbol> <code>      logs
  help                          quit"
        .to_string()
}
