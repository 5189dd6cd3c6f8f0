use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(sales: Option<String>, marketing: Option<String>, output_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(s) = sales {
        settings.sales_path = shellexpand_path(&s);
    }
    if let Some(m) = marketing {
        settings.marketing_path = shellexpand_path(&m);
    }
    if let Some(o) = output_dir {
        settings.output_dir = shellexpand_path(&o);
    }

    let path = save_settings(&settings)?;
    println!("Saved settings to {}", path.display());
    Ok(())
}
