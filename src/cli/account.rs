use crate::cli::commands::CreateAccountArgs;
use crate::db::Database;
use crate::errors::BouncerError;
use crate::models::PlanTier;

pub async fn handle_create_account(args: CreateAccountArgs) -> Result<(), BouncerError> {
    let plan = PlanTier::parse(&args.plan)?;
    let db = Database::new(&args.db)?;
    let account = db.create_account(&args.email, plan)?;

    println!("Account created");
    println!("  id:            {}", account.id);
    println!("  email:         {}", account.email);
    println!("  plan:          {}", account.plan.as_str());
    println!("  monthly limit: {}", account.monthly_limit);
    println!("  api key:       {}", account.api_key);
    println!();
    println!("Pass the key as `Authorization: Bearer {}` on dashboard requests.", account.api_key);
    Ok(())
}
