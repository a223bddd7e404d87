//! Command execution and terminal output

use std::path::PathBuf;

use anyhow::{Context, bail};
use bistro_client::filters::{BillFilter, CustomerFilter, MenuFilter, SortOrder, StaffFilter, TableFilter};
use bistro_client::services::customer::ExportFormat;
use bistro_client::services::reservation::RESERVATION_PAGE_SIZE;
use bistro_client::{BistroClient, ClientError, OrderCart};
use chrono::Datelike;
use shared::cart::CartLine;
use shared::models::{BillCustomer, DiningTable, NewTable};
use shared::money::format_vnd;
use shared::response::PageRequest;

use crate::{Command, CustomerCommand, ExportArg, TableCommand};

type Client = BistroClient;

/// Run a command; client errors surface as their Vietnamese message
pub async fn run(client: &Client, command: Command) -> anyhow::Result<()> {
    match execute(client, command).await {
        Err(e) => match e.downcast_ref::<ClientError>() {
            Some(err) => {
                tracing::debug!(
                    error = %err,
                    category = err.code().category().name(),
                    "Command failed"
                );
                bail!("{}", err.user_message())
            }
            None => Err(e),
        },
        ok => ok,
    }
}

async fn execute(client: &Client, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let user = client.session().login(&username, &password).await?;
            println!("Đã đăng nhập: {} ({})", user.display_name(), user.username);
        }
        Command::Logout => {
            client.session().logout()?;
            println!("Đã đăng xuất");
        }
        Command::Whoami => match client.session().restore().await {
            Some(user) => {
                println!("{} ({})", user.display_name(), user.username);
                if let Some(url) = client.avatar_url() {
                    println!("avatar: {}", url);
                }
            }
            None => bail!("Chưa đăng nhập"),
        },
        Command::Health => {
            if client.menu().health().await {
                println!("ok");
            } else {
                bail!("Máy chủ không phản hồi");
            }
        }
        Command::Tables { command } => tables(client, command).await?,
        Command::Bills {
            from,
            to,
            search,
            page,
        } => {
            let filter = BillFilter {
                from_date: from,
                to_date: to,
                search,
                page,
                limit: None,
            };
            let bills = client.billing().list(&filter).await?;
            for bill in &bills.results {
                println!(
                    "#{:<6} {}  {:<24} {:>14}",
                    bill.id,
                    bill.date,
                    bill.customer_display(),
                    format_vnd(bill.total)
                );
            }
            println!("{} / {} hóa đơn", bills.results.len(), bills.count);
        }
        Command::Menu { search, category } => {
            let items = client.menu().list(&MenuFilter { search, category }).await?;
            for item in &items {
                let mark = if item.is_available { " " } else { "x" };
                println!(
                    "{} {:>4}  {:<28} {:<8} {:>12}",
                    mark,
                    item.id,
                    item.name,
                    item.category.as_str(),
                    format_vnd(item.price)
                );
            }
        }
        Command::Staff { search, role, page } => {
            let filter = StaffFilter {
                search,
                role,
                ..StaffFilter::paged(PageRequest::new(page, 10))
            };
            let staff = client.staff().list(&filter).await?;
            for member in &staff.results {
                println!(
                    "{:>4}  {:<24} {:<10} {:>12}  {}",
                    member.id,
                    member.name,
                    member.role.as_str(),
                    format_vnd(member.salary),
                    member.hire_date
                );
            }
        }
        Command::Customers { command } => customers(client, command).await?,
        Command::Reservations { page } => {
            let reservations = client
                .reservations()
                .list(PageRequest::new(page, RESERVATION_PAGE_SIZE))
                .await?;
            for r in &reservations.results {
                println!(
                    "{:>4}  {} {}  {:<20} {} khách",
                    r.id,
                    r.date,
                    r.time.format("%H:%M"),
                    r.customer_name,
                    r.guests
                );
            }
        }
        Command::Dashboard => {
            let overview = client.dashboard().overview().await;
            let summary = &overview.summary;
            println!("Tổng đơn hàng:      {}", summary.total_orders);
            println!("Giá trị trung bình: {}", format_vnd(summary.average_order_value));
            println!(
                "Doanh thu tháng {}:  {}",
                shared::util::today().month(),
                format_vnd(summary.monthly_revenue)
            );
            println!("Tổng lương:         {}", format_vnd(summary.total_salaries));
            for (title, items) in [("Món ăn", &overview.popular.food), ("Đồ uống", &overview.popular.drinks)] {
                println!("{}:", title);
                for item in items {
                    println!("  {:<28} {:>5}  {:>3}%", item.name, item.sold, item.value);
                }
            }
        }
    }
    Ok(())
}

fn print_table(table: &DiningTable) {
    println!(
        "{:>4}  {:<16} tầng {:<3} {:>2} chỗ  {}",
        table.id,
        table.name,
        table.floor + 1,
        table.capacity,
        table.status.label()
    );
}

/// `12` or `12x3`
fn parse_item(arg: &str) -> anyhow::Result<(i64, u32)> {
    let (id, qty) = match arg.split_once(['x', 'X']) {
        Some((id, qty)) => (id, qty.parse().with_context(|| format!("số lượng không hợp lệ: {}", arg))?),
        None => (arg, 1),
    };
    let id = id.trim().parse().with_context(|| format!("mã món không hợp lệ: {}", arg))?;
    Ok((id, qty))
}

async fn tables(client: &Client, command: TableCommand) -> anyhow::Result<()> {
    let mut board = client.board();
    match command {
        TableCommand::List { floor, status } => {
            board.refresh(TableFilter { floor, status }).await?;
            for floor in board.floors() {
                for table in board.tables_on_floor(floor) {
                    print_table(table);
                }
            }
        }
        TableCommand::Add {
            name,
            floor,
            capacity,
        } => {
            let table = board.add_table(&NewTable::new(name, floor, capacity)).await?;
            print_table(&table);
        }
        TableCommand::Remove { id } => {
            board.remove_table(id).await?;
            println!("Đã xóa bàn {}", id);
        }
        TableCommand::Orders { id } => {
            let orders = board.load_orders(id).await?;
            let cart = OrderCart::from_table_orders(orders);
            for line in cart.lines() {
                println!(
                    "{:>3} x {:<28} {:>12}",
                    line.quantity,
                    line.name,
                    format_vnd(line.subtotal())
                );
            }
            println!("Tổng: {}", format_vnd(cart.total()));
        }
        TableCommand::Order { id, items } => {
            let menu = client.menu();
            let mut cart = OrderCart::new();
            for arg in &items {
                let (menu_id, qty) = parse_item(arg)?;
                let item = menu.get(menu_id).await?;
                if !item.is_available {
                    bail!("Món {} hiện không có sẵn", item.name);
                }
                cart.add_with_quantity(CartLine::from(&item), qty)?;
            }
            let total = cart.total();
            let outcome = board.add_items(id, &mut cart).await?;
            println!("Đã thêm món cho bàn {} ({})", id, format_vnd(total));
            if let Some(reason) = outcome.status_error {
                eprintln!("Cảnh báo: chưa cập nhật được trạng thái bàn: {}", reason);
            }
        }
        TableCommand::Toggle { id } => {
            let status = board.toggle_reservation(id).await?;
            println!("Bàn {}: {}", id, status.label());
        }
        TableCommand::Bill {
            id,
            customer,
            phone,
            date,
        } => {
            let mut details = BillCustomer::new(customer.as_deref(), phone.as_deref());
            if let Some(date) = date {
                details = details.with_date(date);
            }
            let outcome = board.create_bill(id, details).await?;
            println!(
                "Hóa đơn #{}: {} món, {}",
                outcome.receipt.bill_id,
                outcome.receipt.items_count,
                format_vnd(outcome.receipt.total_amount)
            );
            if let Some(reason) = outcome.customer_error {
                eprintln!("Cảnh báo: chưa lưu được thông tin khách hàng: {}", reason);
            }
        }
    }
    Ok(())
}

async fn customers(client: &Client, command: CustomerCommand) -> anyhow::Result<()> {
    match command {
        CustomerCommand::List {
            search,
            loyalty,
            spent,
            sort,
            asc,
            page,
        } => {
            let mut filter = CustomerFilter {
                search,
                loyalty: loyalty.unwrap_or_default(),
                spent: spent.unwrap_or_default(),
                ..CustomerFilter::default()
            }
            .page(page);
            if let Some(field) = sort {
                let order = if asc { SortOrder::Asc } else { SortOrder::Desc };
                filter = filter.sort(field, order);
            }
            let customers = client.customers().list(&filter).await?;
            for c in &customers.results {
                println!(
                    "{:>4}  {:<24} {:<12} {:>6} điểm  {:>14}  {}",
                    c.id,
                    c.name,
                    c.phone.as_deref().unwrap_or("-"),
                    c.loyalty_points,
                    format_vnd(c.total_spent),
                    c.tier()
                );
            }
            println!("{} / {} khách hàng", customers.results.len(), customers.count);
        }
        CustomerCommand::History { id } => {
            let history = client.customers().loyalty_history(id).await?;
            if let Some(message) = &history.message {
                println!("{}", message);
            }
            for entry in &history.history {
                println!(
                    "{:<20} {:>6}  {}",
                    entry.created_at.as_deref().unwrap_or("-"),
                    entry.points,
                    entry.description.as_deref().unwrap_or("")
                );
            }
            println!("Tổng điểm: {}", history.total_points);
        }
        CustomerCommand::Export { format, out } => {
            let format = match format {
                ExportArg::Excel => ExportFormat::Excel,
                ExportArg::Csv => ExportFormat::Csv,
            };
            let bytes = client
                .customers()
                .export(&CustomerFilter::default(), format)
                .await?;
            let path = out.unwrap_or_else(|| PathBuf::from(format!("customers.{}", format.extension())));
            std::fs::write(&path, &bytes)
                .with_context(|| format!("không ghi được {}", path.display()))?;
            println!("Đã xuất {} byte vào {}", bytes.len(), path.display());
        }
    }
    Ok(())
}
