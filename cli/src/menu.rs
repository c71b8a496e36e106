//! Interactive menu loop and its handlers.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::{input, persist, tables, validate};
use biblio_engine::{BookStatus, LendingEngine};
use chrono::{Datelike, Utc};

/// The console menu over a composed engine.
pub struct Menu {
    engine: LendingEngine,
    config: Config,
}

impl Menu {
    pub fn new(engine: LendingEngine, config: Config) -> Self {
        Self { engine, config }
    }

    /// Run the main loop until the user exits.
    pub fn run(mut self) -> Result<()> {
        loop {
            println!();
            println!("==== BIBLIO ====================");
            println!(" 1. Catalog");
            println!(" 2. Members");
            println!(" 3. Lending");
            println!(" 4. Statistics");
            println!(" 5. Save");
            println!(" 6. Exit");
            println!("================================");

            match input::read_int("Choose an option: ")? {
                1 => self.catalog_menu()?,
                2 => self.membership_menu()?,
                3 => self.lending_menu()?,
                4 => {
                    self.attempt(Self::show_statistics)?;
                    input::pause()?;
                }
                5 => {
                    self.attempt(Self::save_data)?;
                    input::pause()?;
                }
                6 => {
                    if input::confirm("Save before exiting? (y/n): ")? {
                        self.attempt(Self::save_data)?;
                    }
                    println!("Goodbye.");
                    return Ok(());
                }
                _ => println!("  Invalid choice, enter 1-6."),
            }
        }
    }

    /// Run a handler, rendering expected failures instead of bubbling them.
    fn attempt(&mut self, action: fn(&mut Self) -> Result<()>) -> Result<()> {
        match action(self) {
            Ok(()) => Ok(()),
            Err(err) if err.is_expected() => {
                println!("  ✗ {err}");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn catalog_menu(&mut self) -> Result<()> {
        loop {
            println!();
            println!("---- Catalog -------------------");
            println!(" 1. Add book");
            println!(" 2. Remove book");
            println!(" 3. Search books");
            println!(" 4. List all books");
            println!(" 5. List available books");
            println!(" 6. Back");

            match input::read_int("Choose an option: ")? {
                1 => self.attempt(Self::add_book)?,
                2 => self.attempt(Self::remove_book)?,
                3 => self.attempt(Self::search_books)?,
                4 => self.attempt(Self::list_all_books)?,
                5 => self.attempt(Self::list_available_books)?,
                6 => return Ok(()),
                _ => println!("  Invalid choice, enter 1-6."),
            }
            input::pause()?;
        }
    }

    fn membership_menu(&mut self) -> Result<()> {
        loop {
            println!();
            println!("---- Members -------------------");
            println!(" 1. Register member");
            println!(" 2. Search members");
            println!(" 3. List all members");
            println!(" 4. Member details");
            println!(" 5. Deactivate member");
            println!(" 6. Activate member");
            println!(" 7. Back");

            match input::read_int("Choose an option: ")? {
                1 => self.attempt(Self::register_member)?,
                2 => self.attempt(Self::search_members)?,
                3 => self.attempt(Self::list_members)?,
                4 => self.attempt(Self::member_details)?,
                5 => self.attempt(Self::deactivate_member)?,
                6 => self.attempt(Self::activate_member)?,
                7 => return Ok(()),
                _ => println!("  Invalid choice, enter 1-7."),
            }
            input::pause()?;
        }
    }

    fn lending_menu(&mut self) -> Result<()> {
        loop {
            println!();
            println!("---- Lending -------------------");
            println!(" 1. Borrow book");
            println!(" 2. Return book");
            println!(" 3. Member transactions");
            println!(" 4. Overdue loans");
            println!(" 5. Recent transactions");
            println!(" 6. Back");

            match input::read_int("Choose an option: ")? {
                1 => self.attempt(Self::borrow_book)?,
                2 => self.attempt(Self::return_book)?,
                3 => self.attempt(Self::member_transactions)?,
                4 => self.attempt(Self::overdue_loans)?,
                5 => self.attempt(Self::recent_transactions)?,
                6 => return Ok(()),
                _ => println!("  Invalid choice, enter 1-6."),
            }
            input::pause()?;
        }
    }

    // -- Catalog handlers --------------------------------------------------

    fn add_book(&mut self) -> Result<()> {
        let isbn = input::read_line("ISBN: ")?;
        if !validate::is_valid_isbn(&isbn) {
            return Err(AppError::InvalidInput(format!("invalid ISBN: {isbn}")));
        }
        let title = input::read_line("Title: ")?;
        if !validate::is_not_empty(&title) {
            return Err(AppError::InvalidInput("title must not be empty".into()));
        }
        let author = input::read_line("Author: ")?;
        if !validate::is_not_empty(&author) {
            return Err(AppError::InvalidInput("author must not be empty".into()));
        }
        let year = input::read_int("Publication year: ")?;
        let current_year = Utc::now().year();
        if !validate::is_valid_publication_year(year, current_year) {
            return Err(AppError::InvalidInput(format!(
                "publication year must be between 1450 and {current_year}"
            )));
        }

        let book = self
            .engine
            .catalog_mut()
            .add_book(isbn, title, author, year, Utc::now().date_naive())?;
        println!("  ✓ Added {} ({})", book.title, book.isbn);
        Ok(())
    }

    fn remove_book(&mut self) -> Result<()> {
        let isbn = input::read_line("ISBN to remove: ")?;
        let removed = self.engine.catalog_mut().remove_book(&isbn)?;
        println!("  ✓ Removed {} ({})", removed.title, removed.isbn);
        Ok(())
    }

    fn search_books(&mut self) -> Result<()> {
        let keyword = input::read_line("Keyword (title/author/ISBN): ")?;
        let results = self.engine.catalog().search(&keyword);
        print!("{}", tables::book_table(&results));
        Ok(())
    }

    fn list_all_books(&mut self) -> Result<()> {
        print!("{}", tables::book_table(&self.engine.catalog().all_books()));
        Ok(())
    }

    fn list_available_books(&mut self) -> Result<()> {
        let available = self.engine.catalog().books_by_status(BookStatus::Available);
        print!("{}", tables::book_table(&available));
        Ok(())
    }

    // -- Membership handlers -----------------------------------------------

    fn register_member(&mut self) -> Result<()> {
        let name = input::read_line("Name: ")?;
        if !validate::is_not_empty(&name) {
            return Err(AppError::InvalidInput("name must not be empty".into()));
        }
        let email = input::read_line("Email: ")?;
        if !validate::is_valid_email(&email) {
            return Err(AppError::InvalidInput(format!("invalid email: {email}")));
        }
        let phone = input::read_line("Phone: ")?;
        if !validate::is_valid_phone(&phone) {
            return Err(AppError::InvalidInput(format!("invalid phone: {phone}")));
        }

        let member = self
            .engine
            .membership_mut()
            .register_member(name, email, phone, Utc::now().date_naive())?;
        println!("  ✓ Registered {} as {}", member.name, member.member_id);
        Ok(())
    }

    fn search_members(&mut self) -> Result<()> {
        let name = input::read_line("Name contains: ")?;
        let results = self.engine.membership().members_by_name(&name);
        print!("{}", tables::member_table(&results));
        Ok(())
    }

    fn list_members(&mut self) -> Result<()> {
        print!(
            "{}",
            tables::member_table(&self.engine.membership().all_members())
        );
        Ok(())
    }

    fn member_details(&mut self) -> Result<()> {
        let member_id = input::read_line("Member ID: ")?;
        let member = self.engine.membership().member(&member_id)?;

        println!("  {} <{}>", member.name, member.email);
        println!("  Phone:      {}", member.phone);
        println!("  Registered: {}", tables::format_date(member.registered_on));
        println!("  Active:     {}", if member.is_active() { "yes" } else { "no" });
        println!("  Borrowed:   {}", member.borrowed_count());

        let open = self.engine.member_open_transactions(&member_id);
        if !open.is_empty() {
            print!("{}", tables::transaction_table(&open, Utc::now()));
        }
        Ok(())
    }

    fn deactivate_member(&mut self) -> Result<()> {
        let member_id = input::read_line("Member ID to deactivate: ")?;
        self.engine.membership_mut().deactivate_member(&member_id)?;
        println!("  ✓ Deactivated {member_id}");
        Ok(())
    }

    fn activate_member(&mut self) -> Result<()> {
        let member_id = input::read_line("Member ID to activate: ")?;
        self.engine.membership_mut().activate_member(&member_id)?;
        println!("  ✓ Activated {member_id}");
        Ok(())
    }

    // -- Lending handlers --------------------------------------------------

    fn borrow_book(&mut self) -> Result<()> {
        let member_id = input::read_line("Member ID: ")?;
        let isbn = input::read_line("ISBN: ")?;

        let transaction = self.engine.borrow(&member_id, &isbn, Utc::now())?;
        println!(
            "  ✓ Borrowed {} as {}; due {}",
            transaction.isbn,
            transaction.transaction_id,
            tables::format_date_time(transaction.due_at)
        );
        Ok(())
    }

    fn return_book(&mut self) -> Result<()> {
        let member_id = input::read_line("Member ID: ")?;
        let isbn = input::read_line("ISBN: ")?;

        let transaction = self.engine.return_book(&member_id, &isbn, Utc::now())?;
        if transaction.late_fee() > 0.0 {
            println!(
                "  ✓ Returned {}; late fee {:.2}",
                transaction.isbn,
                transaction.late_fee()
            );
        } else {
            println!("  ✓ Returned {} on time", transaction.isbn);
        }
        Ok(())
    }

    fn member_transactions(&mut self) -> Result<()> {
        let member_id = input::read_line("Member ID: ")?;
        // Surface the not-found case before printing an empty table
        self.engine.membership().member(&member_id)?;
        let transactions = self.engine.member_transactions(&member_id);
        print!("{}", tables::transaction_table(&transactions, Utc::now()));
        Ok(())
    }

    fn overdue_loans(&mut self) -> Result<()> {
        let now = Utc::now();
        let overdue = self.engine.overdue_transactions(now);
        print!("{}", tables::transaction_table(&overdue, now));
        Ok(())
    }

    fn recent_transactions(&mut self) -> Result<()> {
        let limit = input::read_usize("How many: ")?;
        let recent = self.engine.recent_transactions(limit);
        print!("{}", tables::transaction_table(&recent, Utc::now()));
        Ok(())
    }

    // -- Shared handlers ---------------------------------------------------

    fn show_statistics(&mut self) -> Result<()> {
        let stats = self.engine.statistics(Utc::now());
        print!("{}", tables::statistics_block(&stats));
        Ok(())
    }

    fn save_data(&mut self) -> Result<()> {
        let metadata = persist::save(&self.engine, &self.config.data_file)?;
        println!(
            "  ✓ Saved {} books, {} members, {} transactions to {}",
            metadata.book_count,
            metadata.member_count,
            metadata.transaction_count,
            self.config.data_file.display()
        );
        Ok(())
    }
}
