pub mod feishu;
